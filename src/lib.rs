//! Centipede - A grid-locked arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, ticks)
//! - `game`: Fixed-timestep menu and round loops wired to collaborators
//! - `platform`: Clock and input abstraction
//! - `renderer`: Order-stable draw list handed to a rendering backend
//! - `audio`: Fire-and-forget sound triggers and music cues
//! - `highscores`: Line-oriented leaderboard file
//! - `settings`: JSON settings with environment overrides

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, GameError, MenuOutcome, SessionSummary};
pub use highscores::Leaderboard;
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE_HZ: u32 = 30;
    /// Nominal tick budget in microseconds (1/30 s)
    pub const TICK_MICROS: u64 = 1_000_000 / TICK_RATE_HZ as u64;

    /// Arena dimensions (24 columns x 32 rows of 20-unit cells)
    pub const ARENA_WIDTH: i32 = 480;
    pub const ARENA_HEIGHT: i32 = 640;
    pub const CELL_SIZE: i32 = 20;
    pub const COLS: i32 = ARENA_WIDTH / CELL_SIZE;
    pub const ROWS: i32 = ARENA_HEIGHT / CELL_SIZE;
    /// Centre of the first lattice row/column
    pub const FIRST_CENTER: i32 = CELL_SIZE / 2;
    /// Centre of the last lattice row
    pub const LAST_ROW: i32 = ARENA_HEIGHT - CELL_SIZE / 2;

    /// Player band (centre y range the player may occupy)
    pub const PLAYER_BAND_TOP: i32 = 550;
    pub const PLAYER_BAND_BOTTOM: i32 = 630;
    pub const PLAYER_MIN_X: i32 = 10;
    pub const PLAYER_MAX_X: i32 = 470;
    pub const PLAYER_SPEED: i32 = 4;
    pub const PLAYER_SPAWN: (i32, i32) = (240, 625);

    /// Spider zig-zag zone: the bottom 8 rows
    pub const SPIDER_ZONE_TOP: i32 = 480;

    /// Lasers
    pub const LASER_SPEED: i32 = 20;
    pub const FIRE_COOLDOWN_MS: u64 = 500;

    /// Centipede wave
    pub const WAVE_LENGTH: usize = 12;
    pub const SEGMENT_SPEED: i32 = 4;
    pub const WAVE_SPAWN_X: i32 = 200;

    /// Auxiliary enemies
    pub const SPIDER_DX: i32 = 2;
    pub const SPIDER_DY: i32 = 4;
    pub const FLEA_SPEED: i32 = 5;
    pub const SCORPION_DX: i32 = 3;
    /// Highest centre y a scorpion may pick (rows above the player band)
    pub const SCORPION_MAX_ROW: i32 = 530;
    /// Flea mushroom drop odds (1 in N per lattice row)
    pub const FLEA_DROP_ODDS: u32 = 15;
    /// Spider chews a touched mushroom (1 in N per tick)
    pub const SPIDER_CHEW_ODDS: u32 = 3;

    /// Respawn delays after a category empties
    pub const WAVE_RESPAWN_MS: u64 = 1500;
    pub const SPIDER_RESPAWN_MS: u64 = 5000;
    pub const FLEA_RESPAWN_MS: u64 = 7000;
    pub const SCORPION_RESPAWN_MS: u64 = 6000;

    /// Mushrooms
    pub const MUSHROOM_HEALTH: u8 = 4;
    pub const SCATTER_COUNT: usize = 20;

    /// Lives and stalls
    pub const STARTING_LIVES: u8 = 3;
    pub const LIFE_LOST_PAUSE_MS: u64 = 1000;
    pub const ROUND_END_FADE_MS: u64 = 2000;
    pub const QUIT_FADE_MS: u64 = 3000;
    pub const QUIT_STALL_MS: u64 = 3500;

    /// Points
    pub const SEGMENT_POINTS: u64 = 50;
    pub const MUSHROOM_POINTS: u64 = 1;
    pub const SPIDER_POINTS: u64 = 600;
    pub const FLEA_POINTS: u64 = 200;
    pub const SCORPION_POINTS: u64 = 1000;
    pub const MUSHROOM_REPAIR_POINTS: u64 = 5;
}

use consts::*;

/// True if `y` is the centre of a lattice row
#[inline]
pub fn is_lattice_row(y: i32) -> bool {
    (FIRST_CENTER..=LAST_ROW).contains(&y) && (y - FIRST_CENTER) % CELL_SIZE == 0
}

/// Snap a point to the nearest lattice cell centre inside the arena
pub fn snap_to_lattice(pos: IVec2) -> IVec2 {
    let snap = |v: i32, max_center: i32| {
        let cell = (v - FIRST_CENTER + CELL_SIZE / 2).div_euclid(CELL_SIZE);
        (FIRST_CENTER + cell * CELL_SIZE).clamp(FIRST_CENTER, max_center)
    };
    IVec2::new(
        snap(pos.x, ARENA_WIDTH - FIRST_CENTER),
        snap(pos.y, LAST_ROW),
    )
}
