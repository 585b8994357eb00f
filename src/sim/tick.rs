//! Fixed timestep simulation tick
//!
//! Advances a round (or the attract screen) by exactly one 1/30 s step.
//! Time only enters through `now_ms`, a monotonic clock reading used for the
//! fire cooldown and the respawn timers.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{resolve_collisions, resolve_menu_collisions};
use super::entity::{Entity, Laser, TickContext};
use super::spawn::EnemyKind;
use super::state::{GameEvent, GamePhase, GameState, MenuState};
use crate::consts::*;

/// Continuous (level-triggered) key state sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl KeyState {
    /// Unit direction with fixed priority: up, down, left, right
    pub fn direction(&self) -> IVec2 {
        if self.up {
            IVec2::new(0, -1)
        } else if self.down {
            IVec2::new(0, 1)
        } else if self.left {
            IVec2::new(-1, 0)
        } else if self.right {
            IVec2::new(1, 0)
        } else {
            IVec2::ZERO
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Unit movement direction
    pub direction: IVec2,
    /// Fire held this tick
    pub fire: bool,
}

impl From<KeyState> for TickInput {
    fn from(keys: KeyState) -> Self {
        Self {
            direction: keys.direction(),
            fire: keys.fire,
        }
    }
}

/// Advance a round by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.time_ticks += 1;

    state.player.set_direction(input.direction);

    if input.fire && now_ms.saturating_sub(state.last_shot_ms) >= FIRE_COOLDOWN_MS {
        state.entities.lasers.push(Laser::new(state.player.muzzle()));
        state.last_shot_ms = now_ms;
        state.events.push(GameEvent::ShotFired);
    }

    state
        .spawner
        .run(&mut state.entities, &mut state.rng, now_ms, &mut state.events);

    let wave_alive = !state.entities.segments.is_empty();
    {
        let mut ctx = TickContext::new(&mut state.rng);
        state.player.update(&mut ctx);
    }
    state.entities.update(&mut state.rng);

    resolve_collisions(state, now_ms);

    if wave_alive && state.entities.segments.is_empty() {
        state.spawner.record_death(EnemyKind::Centipede, now_ms);
        state.events.push(GameEvent::WaveCleared);
        log::info!("Wave cleared at tick {}", state.time_ticks);
    }

    if state.lives.is_out() {
        state.phase = GamePhase::GameOver;
        let score = state.score.value();
        state.events.push(GameEvent::RoundOver { score });
        log::info!("Round over after {} ticks, score {}", state.time_ticks, score);
    }
}

/// Advance the attract screen by one fixed timestep
pub fn menu_tick(menu: &mut MenuState, now_ms: u64) {
    menu.time_ticks += 1;
    menu.spawner
        .run(&mut menu.entities, &mut menu.rng, now_ms, &mut menu.events);
    menu.entities.update(&mut menu.rng);
    resolve_menu_collisions(&mut menu.entities);
}
