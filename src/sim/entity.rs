//! Entities and their per-tick behaviors
//!
//! Every entity shares a [`Body`] (centre position, per-tick velocity, alive
//! flag) and implements [`Entity`]. Variant-specific state lives next to the
//! body in each struct. Entities never remove themselves from a container:
//! they clear their alive flag and the owning [`EntitySet`](super::EntitySet)
//! prunes them in one pass.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::{Rect, center_for_left, center_for_right, center_for_top};
use crate::consts::*;
use crate::is_lattice_row;

/// Visual state selector handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Player,
    Laser,
    Mushroom,
    PoisonMushroom,
    /// Segment travelling up or down the screen
    SegmentVertical,
    /// Segment travelling along a row
    SegmentHorizontal,
    Spider,
    Flea,
    ScorpionLeft,
    ScorpionRight,
}

/// Position/velocity/lifecycle shared by all entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the bounding box
    pub pos: IVec2,
    /// Displacement applied per tick
    pub vel: IVec2,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: IVec2, vel: IVec2) -> Self {
        Self {
            pos,
            vel,
            alive: true,
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// Per-tick services available to behaviors
pub struct TickContext<'a> {
    pub rng: &'a mut Pcg32,
    /// Mushrooms created during the update pass (flea droppings)
    pub spawned: Vec<Mushroom>,
}

impl<'a> TickContext<'a> {
    pub fn new(rng: &'a mut Pcg32) -> Self {
        Self {
            rng,
            spawned: Vec::new(),
        }
    }
}

/// Common contract for everything that lives in the arena
pub trait Entity {
    /// Bounding box size in arena units
    const SIZE: IVec2;

    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    fn sprite(&self) -> Sprite;

    /// Advance one fixed tick
    fn update(&mut self, ctx: &mut TickContext<'_>);

    fn pos(&self) -> IVec2 {
        self.body().pos
    }

    fn rect(&self) -> Rect {
        Rect::from_center(self.body().pos, Self::SIZE)
    }

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    fn destroy(&mut self) {
        self.body_mut().alive = false;
    }
}

macro_rules! impl_body {
    () => {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
    };
}

/// The player's shooter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            body: Body::new(IVec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1), IVec2::ZERO),
        }
    }
}

impl Player {
    /// Set the unit direction (screen coordinates, +y is down)
    pub fn set_direction(&mut self, dir: IVec2) {
        self.body.vel = dir * PLAYER_SPEED;
    }

    /// Where a freshly fired laser appears
    pub fn muzzle(&self) -> IVec2 {
        IVec2::new(self.body.pos.x, self.rect().top)
    }
}

impl Entity for Player {
    const SIZE: IVec2 = IVec2::new(20, 20);

    impl_body!();

    fn sprite(&self) -> Sprite {
        Sprite::Player
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        let next = self.body.pos + self.body.vel;
        self.body.pos = IVec2::new(
            next.x.clamp(PLAYER_MIN_X, PLAYER_MAX_X),
            next.y.clamp(PLAYER_BAND_TOP, PLAYER_BAND_BOTTOM),
        );
    }
}

/// A laser bolt travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub body: Body,
}

impl Laser {
    pub fn new(muzzle: IVec2) -> Self {
        Self {
            body: Body::new(muzzle, IVec2::new(0, -LASER_SPEED)),
        }
    }
}

impl Entity for Laser {
    const SIZE: IVec2 = IVec2::new(2, 15);

    impl_body!();

    fn sprite(&self) -> Sprite {
        Sprite::Laser
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        self.body.advance();
        if self.rect().bottom() <= 0 {
            self.destroy();
        }
    }
}

/// A static obstacle that absorbs lasers and deflects the centipede
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mushroom {
    pub body: Body,
    pub health: u8,
    pub poisonous: bool,
}

impl Mushroom {
    pub fn new(pos: IVec2) -> Self {
        Self {
            body: Body::new(pos, IVec2::ZERO),
            health: MUSHROOM_HEALTH,
            poisonous: false,
        }
    }

    /// Random field of mushrooms away from the arena edges
    pub fn scatter(rng: &mut Pcg32, count: usize) -> Vec<Mushroom> {
        (0..count)
            .map(|_| {
                let x = 30 + rng.random_range(0..22) * CELL_SIZE;
                let y = 30 + rng.random_range(0..30) * CELL_SIZE;
                Mushroom::new(IVec2::new(x, y))
            })
            .collect()
    }

    /// Take one laser hit. Returns true only on the hit that empties health.
    pub fn damage(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        if self.health == 0 {
            self.destroy();
            true
        } else {
            false
        }
    }

    /// Restore full health. Returns true if the mushroom was damaged.
    pub fn heal(&mut self) -> bool {
        if self.health < MUSHROOM_HEALTH {
            self.health = MUSHROOM_HEALTH;
            true
        } else {
            false
        }
    }

    pub fn is_damaged(&self) -> bool {
        self.health < MUSHROOM_HEALTH
    }
}

impl Entity for Mushroom {
    const SIZE: IVec2 = IVec2::new(20, 20);

    impl_body!();

    fn sprite(&self) -> Sprite {
        if self.poisonous {
            Sprite::PoisonMushroom
        } else {
            Sprite::Mushroom
        }
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        if self.health == 0 {
            self.destroy();
        }
    }
}

/// Direction a segment is currently travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Descending,
    Ascending,
    Left,
    Right,
}

/// One body segment of the centipede
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub body: Body,
    /// Signed vertical speed used for the next vertical run
    pub speed: i32,
    /// Horizontal velocity of the previous horizontal run
    pub last_dx: i32,
    /// Has touched the bottom row at least once
    pub reached_bottom: bool,
    pub poisoned: bool,
    /// Set by a mushroom collision; consumed by the next update
    pub hit_mushroom: bool,
}

impl Segment {
    /// New segment descending from `(WAVE_SPAWN_X, y)`
    pub fn new(y: i32, speed: i32) -> Self {
        Self {
            body: Body::new(IVec2::new(WAVE_SPAWN_X, y), IVec2::new(0, speed)),
            speed,
            last_dx: speed,
            reached_bottom: false,
            poisoned: false,
            hit_mushroom: false,
        }
    }

    /// A full wave: head on the top row, the rest queued above the arena
    pub fn wave() -> Vec<Segment> {
        (0..WAVE_LENGTH as i32)
            .map(|i| Segment::new(FIRST_CENTER - i * CELL_SIZE, SEGMENT_SPEED))
            .collect()
    }

    pub fn heading(&self) -> Heading {
        let vel = self.body.vel;
        if vel.x < 0 {
            Heading::Left
        } else if vel.x > 0 {
            Heading::Right
        } else if vel.y < 0 {
            Heading::Ascending
        } else {
            Heading::Descending
        }
    }

    /// Force a vertical step on the next update
    pub fn bump(&mut self) {
        self.hit_mushroom = true;
    }

    fn go_vertical(&mut self) {
        self.body.vel = IVec2::new(0, self.speed);
    }

    fn at_side_wall(&self) -> bool {
        self.body.pos.x <= PLAYER_MIN_X || self.body.pos.x >= PLAYER_MAX_X
    }
}

impl Entity for Segment {
    const SIZE: IVec2 = IVec2::new(20, 20);

    impl_body!();

    fn sprite(&self) -> Sprite {
        if self.body.vel.x == 0 {
            Sprite::SegmentVertical
        } else {
            Sprite::SegmentHorizontal
        }
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        let y = self.body.pos.y;
        let magnitude = self.speed.abs();

        if y >= LAST_ROW {
            self.reached_bottom = true;
            self.poisoned = false;
            self.speed = -magnitude;
        }
        if self.reached_bottom && y <= PLAYER_BAND_TOP {
            self.poisoned = false;
            self.speed = magnitude;
        }

        if is_lattice_row(y) && self.body.vel.y != 0 {
            let dx = -self.last_dx;
            self.body.vel = IVec2::new(dx, 0);
            self.last_dx = dx;
        } else if self.at_side_wall() && self.body.vel.x != 0 {
            self.go_vertical();
        } else if self.hit_mushroom || self.poisoned {
            // poisoned segments keep plunging; one sideways step per row
            self.go_vertical();
        }

        self.hit_mushroom = false;
        self.body.advance();

        let rect = self.rect();
        if rect.right() < 0 || rect.left > ARENA_WIDTH || rect.top > ARENA_HEIGHT {
            self.destroy();
        }
    }
}

/// Zig-zags across the bottom rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spider {
    pub body: Body,
}

impl Spider {
    /// Enter from a random side at the top of the spider zone
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let from_left = rng.random_range(0..2) == 0;
        Self::entering(from_left)
    }

    pub fn entering(from_left: bool) -> Self {
        let w = Self::SIZE.x;
        let (x, dx) = if from_left {
            (center_for_left(0, w), SPIDER_DX)
        } else {
            (center_for_right(ARENA_WIDTH, w), -SPIDER_DX)
        };
        let y = center_for_top(SPIDER_ZONE_TOP, Self::SIZE.y);
        Self {
            body: Body::new(IVec2::new(x, y), IVec2::new(dx, SPIDER_DY)),
        }
    }

    /// Crossed the left or right edge
    pub fn has_exited(&self) -> bool {
        let left = self.rect().left;
        left < 0 || left > ARENA_WIDTH
    }
}

impl Entity for Spider {
    const SIZE: IVec2 = IVec2::new(20, 20);

    impl_body!();

    fn sprite(&self) -> Sprite {
        Sprite::Spider
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        let rect = self.rect();
        if rect.top < SPIDER_ZONE_TOP || rect.bottom() > ARENA_HEIGHT {
            self.body.vel.y = -self.body.vel.y;
        }
        self.body.advance();
    }
}

/// Drops straight down a column, seeding mushrooms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flea {
    pub body: Body,
}

impl Flea {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let column = rng.random_range(0..COLS);
        Self::in_column(column)
    }

    pub fn in_column(column: i32) -> Self {
        let x = FIRST_CENTER + column * CELL_SIZE;
        let y = center_for_top(0, Self::SIZE.y);
        Self {
            body: Body::new(IVec2::new(x, y), IVec2::new(0, FLEA_SPEED)),
        }
    }

    /// Fell through the bottom of the arena
    pub fn has_exited(&self) -> bool {
        self.rect().top > ARENA_HEIGHT
    }
}

impl Entity for Flea {
    const SIZE: IVec2 = IVec2::new(20, 20);

    impl_body!();

    fn sprite(&self) -> Sprite {
        Sprite::Flea
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        if is_lattice_row(self.body.pos.y) && ctx.rng.random_range(0..FLEA_DROP_ODDS) == 0 {
            ctx.spawned.push(Mushroom::new(self.body.pos));
        }
        self.body.advance();
    }
}

/// Crawls along one row, poisoning mushrooms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scorpion {
    pub body: Body,
}

impl Scorpion {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let from_left = rng.random_range(0..2) == 0;
        let rows = (SCORPION_MAX_ROW - FIRST_CENTER) / CELL_SIZE + 1;
        let y = FIRST_CENTER + rng.random_range(0..rows) * CELL_SIZE;
        Self::entering(from_left, y)
    }

    pub fn entering(from_left: bool, y: i32) -> Self {
        let w = Self::SIZE.x;
        let (x, dx) = if from_left {
            (center_for_left(0, w), SCORPION_DX)
        } else {
            (center_for_right(ARENA_WIDTH, w), -SCORPION_DX)
        };
        Self {
            body: Body::new(IVec2::new(x, y), IVec2::new(dx, 0)),
        }
    }

    /// Fully past the left edge or starting past the right edge
    pub fn has_exited(&self) -> bool {
        let rect = self.rect();
        rect.right() < 0 || rect.left > ARENA_WIDTH
    }
}

impl Entity for Scorpion {
    const SIZE: IVec2 = IVec2::new(25, 20);

    impl_body!();

    fn sprite(&self) -> Sprite {
        if self.body.vel.x < 0 {
            Sprite::ScorpionLeft
        } else {
            Sprite::ScorpionRight
        }
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        self.body.advance();
    }
}
