//! Game state and core simulation types
//!
//! The round owns one container per entity category. Containers only shrink
//! through [`EntitySet::prune`], so an entity destroyed mid-tick leaves every
//! view of the simulation at the same moment.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{
    Entity, Flea, Laser, Mushroom, Player, Scorpion, Segment, Spider, TickContext,
};
use super::spawn::{EnemyKind, SpawnScheduler};
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lives exhausted; final score is frozen
    GameOver,
}

/// Things that happened during a tick, drained by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    /// A laser destroyed one centipede segment
    SegmentKilled,
    /// A laser destroyed a spider, flea or scorpion
    EnemyKilled { kind: EnemyKind },
    /// A laser emptied a mushroom's health
    MushroomCleared,
    WaveSpawned,
    /// Last segment of the wave destroyed
    WaveCleared,
    EnemySpawned { kind: EnemyKind },
    /// Enemy walked off the arena
    EnemyExited { kind: EnemyKind },
    LifeLost { lives_left: u8 },
    RoundOver { score: u64 },
}

/// Monotonic score counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    value: u64,
}

impl ScoreKeeper {
    pub fn add(&mut self, points: u64) {
        self.value = self.value.saturating_add(points);
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Remaining lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeCounter {
    lives: u8,
}

impl Default for LifeCounter {
    fn default() -> Self {
        Self {
            lives: STARTING_LIVES,
        }
    }
}

impl LifeCounter {
    /// Lose one life and return how many remain
    pub fn lose_one(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn remaining(&self) -> u8 {
        self.lives
    }

    pub fn is_out(&self) -> bool {
        self.lives == 0
    }
}

/// One container per entity category (the player lives outside)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySet {
    pub lasers: Vec<Laser>,
    pub segments: Vec<Segment>,
    pub mushrooms: Vec<Mushroom>,
    pub scorpions: Vec<Scorpion>,
    pub spiders: Vec<Spider>,
    pub fleas: Vec<Flea>,
}

impl EntitySet {
    pub fn with_mushrooms(mushrooms: Vec<Mushroom>) -> Self {
        Self {
            mushrooms,
            ..Default::default()
        }
    }

    /// Run every live entity's behavior, then drop whatever died
    pub fn update(&mut self, rng: &mut Pcg32) {
        let mut ctx = TickContext::new(rng);
        update_group(&mut self.lasers, &mut ctx);
        update_group(&mut self.segments, &mut ctx);
        update_group(&mut self.mushrooms, &mut ctx);
        update_group(&mut self.scorpions, &mut ctx);
        update_group(&mut self.spiders, &mut ctx);
        update_group(&mut self.fleas, &mut ctx);
        self.mushrooms.extend(ctx.spawned);
        self.prune();
    }

    /// Remove destroyed entities from every container
    pub fn prune(&mut self) {
        self.lasers.retain(|e| e.is_alive());
        self.segments.retain(|e| e.is_alive());
        self.mushrooms.retain(|e| e.is_alive());
        self.scorpions.retain(|e| e.is_alive());
        self.spiders.retain(|e| e.is_alive());
        self.fleas.retain(|e| e.is_alive());
    }

    /// Drop every enemy; lasers and mushrooms stay
    pub fn clear_enemies(&mut self) {
        self.segments.clear();
        self.spiders.clear();
        self.fleas.clear();
        self.scorpions.clear();
    }

    /// Total live entities across all containers
    pub fn len(&self) -> usize {
        self.lasers.len()
            + self.segments.len()
            + self.mushrooms.len()
            + self.scorpions.len()
            + self.spiders.len()
            + self.fleas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn update_group<E: Entity>(group: &mut [E], ctx: &mut TickContext<'_>) {
    for entity in group.iter_mut().filter(|e| e.is_alive()) {
        entity.update(ctx);
    }
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub entities: EntitySet,
    pub score: ScoreKeeper,
    pub lives: LifeCounter,
    pub spawner: SpawnScheduler,
    /// Clock reading of the last laser shot
    pub last_shot_ms: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a round over an existing mushroom field; the first wave enters now
    pub fn new(rng: Pcg32, mushrooms: Vec<Mushroom>, now_ms: u64) -> Self {
        let mut entities = EntitySet::with_mushrooms(mushrooms);
        entities.segments = Segment::wave();
        Self {
            rng,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::default(),
            entities,
            score: ScoreKeeper::default(),
            lives: LifeCounter::default(),
            spawner: SpawnScheduler::new(now_ms),
            last_shot_ms: now_ms,
            events: Vec::new(),
        }
    }

    /// Start a round with its own freshly scattered mushroom field
    pub fn with_seed(seed: u64, now_ms: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mushrooms = Mushroom::scatter(&mut rng, SCATTER_COUNT);
        Self::new(rng, mushrooms, now_ms)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events produced since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Attract-screen state: a wandering wave, a mushroom field and spiders
#[derive(Debug, Clone)]
pub struct MenuState {
    pub rng: Pcg32,
    pub time_ticks: u64,
    pub entities: EntitySet,
    pub spawner: SpawnScheduler,
    pub events: Vec<GameEvent>,
}

impl MenuState {
    pub fn new(seed: u64, now_ms: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed), now_ms)
    }

    pub fn from_rng(mut rng: Pcg32, now_ms: u64) -> Self {
        let mushrooms = Mushroom::scatter(&mut rng, SCATTER_COUNT);
        let mut entities = EntitySet::with_mushrooms(mushrooms);
        entities.segments = Segment::wave();
        Self {
            rng,
            time_ticks: 0,
            entities,
            spawner: SpawnScheduler::for_menu(now_ms),
            events: Vec::new(),
        }
    }

    /// Hand the mushroom field and RNG over to a round; every enemy is dropped
    pub fn into_round(self, now_ms: u64) -> GameState {
        let MenuState { rng, entities, .. } = self;
        GameState::new(rng, entities.mushrooms, now_ms)
    }
}
