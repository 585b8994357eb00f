//! Rendering seam
//!
//! The loops build one [`Frame`] per tick: an order-stable draw list of live
//! entities plus overlays (HUD, menu text, transition messages). Backends
//! implement [`Renderer`] and never see the simulation containers.

pub mod text;

use glam::IVec2;

use crate::sim::{Entity, GameState, MenuState};
pub use crate::sim::Sprite;
pub use text::TextRenderer;

/// Backdrop shared by the menu and the round
pub const BACKGROUND: &str = "crystal-cave";

/// One entity to draw, centred on `pos`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub sprite: Sprite,
    pub pos: IVec2,
}

/// Text layered over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Score, lives and the leaderboard's leading score
    Hud { score: u64, lives: u8, leading: u64 },
    /// Title, leaderboard lead, personal session best, start prompt
    Menu { leading: u64, best: u64 },
    GameOver,
    /// Farewell message; `score_saved` adds the leaderboard note
    Thanks { score_saved: bool },
}

/// Everything a backend needs for one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Live entities in draw order (later items paint over earlier ones)
    pub items: Vec<DrawItem>,
    pub overlays: Vec<Overlay>,
    pub background: Option<&'static str>,
}

impl Frame {
    /// Round view: lasers, player, segments, mushrooms, scorpions, spiders,
    /// fleas, then the HUD
    pub fn from_round(state: &GameState, leading: u64) -> Self {
        let ents = &state.entities;
        let mut frame = Self {
            items: Vec::with_capacity(ents.len() + 1),
            overlays: Vec::new(),
            background: Some(BACKGROUND),
        };
        frame.push_all(&ents.lasers);
        frame.push(&state.player);
        frame.push_all(&ents.segments);
        frame.push_all(&ents.mushrooms);
        frame.push_all(&ents.scorpions);
        frame.push_all(&ents.spiders);
        frame.push_all(&ents.fleas);
        frame.overlays.push(Overlay::Hud {
            score: state.score.value(),
            lives: state.lives.remaining(),
            leading,
        });
        frame
    }

    /// Attract view: segments, mushrooms, spiders, then the menu text
    pub fn from_menu(menu: &MenuState, leading: u64, best: u64) -> Self {
        let ents = &menu.entities;
        let mut frame = Self {
            items: Vec::with_capacity(ents.len()),
            overlays: Vec::new(),
            background: Some(BACKGROUND),
        };
        frame.push_all(&ents.segments);
        frame.push_all(&ents.mushrooms);
        frame.push_all(&ents.spiders);
        frame.overlays.push(Overlay::Menu { leading, best });
        frame
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlays.push(overlay);
        self
    }

    fn push<E: Entity>(&mut self, entity: &E) {
        if entity.is_alive() {
            self.items.push(DrawItem {
                sprite: entity.sprite(),
                pos: entity.pos(),
            });
        }
    }

    fn push_all<E: Entity>(&mut self, group: &[E]) {
        for entity in group {
            self.push(entity);
        }
    }
}

/// A rendering backend
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Flea, Laser, Scorpion, Spider};

    #[test]
    fn test_round_draw_order() {
        let mut state = GameState::with_seed(8, 0);
        state.entities.lasers.push(Laser::new(IVec2::new(100, 300)));
        state.entities.spiders.push(Spider::entering(true));
        state.entities.fleas.push(Flea::in_column(2));
        state.entities.scorpions.push(Scorpion::entering(false, 110));

        let frame = Frame::from_round(&state, 700);
        let sprites: Vec<Sprite> = frame.items.iter().map(|i| i.sprite).collect();
        assert_eq!(sprites[0], Sprite::Laser);
        assert_eq!(sprites[1], Sprite::Player);
        assert_eq!(sprites[2], Sprite::SegmentVertical);
        let last = sprites.len() - 1;
        assert_eq!(sprites[last], Sprite::Flea);
        assert_eq!(sprites[last - 1], Sprite::Spider);
        assert_eq!(sprites[last - 2], Sprite::ScorpionLeft);
        assert_eq!(sprites[last - 3], Sprite::Mushroom);
        assert_eq!(frame.items.len(), state.entities.len() + 1);
        assert_eq!(
            frame.overlays,
            vec![Overlay::Hud {
                score: 0,
                lives: 3,
                leading: 700
            }]
        );
        assert_eq!(frame.background, Some(BACKGROUND));
    }

    #[test]
    fn test_menu_frame_skips_dead() {
        let mut menu = MenuState::new(8, 0);
        menu.entities.mushrooms[0].health = 0;
        menu.entities.mushrooms[0].body.alive = false;
        let frame = Frame::from_menu(&menu, 10, 5).with_overlay(Overlay::Thanks { score_saved: true });
        assert_eq!(frame.items.len(), menu.entities.len() - 1);
        assert_eq!(frame.overlays.len(), 2);
    }
}
