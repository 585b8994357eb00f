//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (container order, then category order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geom;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{LaserTarget, lose_life, resolve_collisions};
pub use entity::{
    Body, Entity, Flea, Heading, Laser, Mushroom, Player, Scorpion, Segment, Spider, Sprite,
    TickContext,
};
pub use geom::Rect;
pub use spawn::{EnemyKind, SpawnScheduler};
pub use state::{
    EntitySet, GameEvent, GamePhase, GameState, LifeCounter, MenuState, ScoreKeeper,
};
pub use tick::{KeyState, TickInput, menu_tick, tick};
