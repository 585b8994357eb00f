//! Respawn timers for the enemy categories
//!
//! Each category owns a last-death timestamp and a fixed delay. A category
//! respawns once its population is empty and the delay has elapsed. Spiders,
//! fleas and scorpions that wander off the arena are culled here and restart
//! their timer.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Flea, Scorpion, Segment, Spider};
use super::state::{EntitySet, GameEvent};
use crate::consts::*;

/// Enemy categories with independent respawn timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Centipede,
    Spider,
    Flea,
    Scorpion,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Centipede,
        EnemyKind::Spider,
        EnemyKind::Flea,
        EnemyKind::Scorpion,
    ];

    pub fn respawn_delay_ms(self) -> u64 {
        match self {
            EnemyKind::Centipede => WAVE_RESPAWN_MS,
            EnemyKind::Spider => SPIDER_RESPAWN_MS,
            EnemyKind::Flea => FLEA_RESPAWN_MS,
            EnemyKind::Scorpion => SCORPION_RESPAWN_MS,
        }
    }

    /// Points for shooting one of these
    pub fn points(self) -> u64 {
        match self {
            EnemyKind::Centipede => SEGMENT_POINTS,
            EnemyKind::Spider => SPIDER_POINTS,
            EnemyKind::Flea => FLEA_POINTS,
            EnemyKind::Scorpion => SCORPION_POINTS,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct RespawnTimer {
    delay_ms: u64,
    last_death_ms: u64,
}

impl RespawnTimer {
    fn ready(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_death_ms) >= self.delay_ms
    }
}

/// Per-category respawn bookkeeping
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    timers: [RespawnTimer; 4],
    /// Categories this scheduler manages, in evaluation order
    roster: &'static [EnemyKind],
}

impl SpawnScheduler {
    /// Scheduler for a round: every category, all timers starting at `now_ms`
    pub fn new(now_ms: u64) -> Self {
        Self::with_roster(&EnemyKind::ALL, now_ms)
    }

    /// Scheduler for the attract screen: spiders only
    pub fn for_menu(now_ms: u64) -> Self {
        Self::with_roster(&[EnemyKind::Spider], now_ms)
    }

    fn with_roster(roster: &'static [EnemyKind], now_ms: u64) -> Self {
        let timers = EnemyKind::ALL.map(|kind| RespawnTimer {
            delay_ms: kind.respawn_delay_ms(),
            last_death_ms: now_ms,
        });
        Self { timers, roster }
    }

    /// Restart a category's timer (kill, clear or escape)
    pub fn record_death(&mut self, kind: EnemyKind, now_ms: u64) {
        self.timers[kind.index()].last_death_ms = now_ms;
    }

    /// Timestamp of the most recent death/clear for `kind`
    pub fn last_death_ms(&self, kind: EnemyKind) -> u64 {
        self.timers[kind.index()].last_death_ms
    }

    /// True if `kind` may respawn at `now_ms` (population not considered)
    pub fn is_due(&self, kind: EnemyKind, now_ms: u64) -> bool {
        self.timers[kind.index()].ready(now_ms)
    }

    /// Restart the auxiliary enemies' timers, e.g. after a life is lost
    pub fn restart_auxiliaries(&mut self, now_ms: u64) {
        for kind in [EnemyKind::Spider, EnemyKind::Flea, EnemyKind::Scorpion] {
            self.record_death(kind, now_ms);
        }
    }

    /// Cull escaped enemies and repopulate empty categories that are due.
    /// At most one spawn per category per call.
    pub fn run(
        &mut self,
        entities: &mut EntitySet,
        rng: &mut Pcg32,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) {
        let roster = self.roster;
        for &kind in roster {
            let spawned = match kind {
                EnemyKind::Centipede => {
                    if entities.segments.is_empty() && self.is_due(kind, now_ms) {
                        entities.segments = Segment::wave();
                        events.push(GameEvent::WaveSpawned);
                        log::info!("Centipede wave spawned at {} ms", now_ms);
                        true
                    } else {
                        false
                    }
                }
                EnemyKind::Spider => self.cycle(
                    kind,
                    &mut entities.spiders,
                    Spider::has_exited,
                    || Spider::spawn(rng),
                    now_ms,
                    events,
                ),
                EnemyKind::Flea => self.cycle(
                    kind,
                    &mut entities.fleas,
                    Flea::has_exited,
                    || Flea::spawn(rng),
                    now_ms,
                    events,
                ),
                EnemyKind::Scorpion => self.cycle(
                    kind,
                    &mut entities.scorpions,
                    Scorpion::has_exited,
                    || Scorpion::spawn(rng),
                    now_ms,
                    events,
                ),
            };
            if spawned {
                log::debug!("{:?} spawned at {} ms", kind, now_ms);
            }
        }
        entities.prune();
    }

    /// Cull-or-spawn for one auxiliary category. Returns true on spawn.
    fn cycle<E: Entity>(
        &mut self,
        kind: EnemyKind,
        group: &mut Vec<E>,
        has_exited: impl Fn(&E) -> bool,
        spawn: impl FnOnce() -> E,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if group.iter().any(|e| e.is_alive()) {
            for enemy in group.iter_mut().filter(|e| e.is_alive()) {
                if has_exited(enemy) {
                    enemy.destroy();
                    self.record_death(kind, now_ms);
                    events.push(GameEvent::EnemyExited { kind });
                }
            }
            false
        } else if self.is_due(kind, now_ms) {
            group.push(spawn());
            events.push(GameEvent::EnemySpawned { kind });
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use rand::SeedableRng;

    fn setup() -> (EntitySet, Pcg32, Vec<GameEvent>) {
        (EntitySet::default(), Pcg32::seed_from_u64(11), Vec::new())
    }

    #[test]
    fn test_spider_waits_for_delay() {
        let (mut ents, mut rng, mut events) = setup();
        let mut sched = SpawnScheduler::new(1000);

        sched.run(&mut ents, &mut rng, 1000 + SPIDER_RESPAWN_MS - 1, &mut events);
        assert!(ents.spiders.is_empty());

        sched.run(&mut ents, &mut rng, 1000 + SPIDER_RESPAWN_MS, &mut events);
        assert_eq!(ents.spiders.len(), 1);

        // No double spawn while one is alive
        sched.run(&mut ents, &mut rng, 1000 + SPIDER_RESPAWN_MS * 3, &mut events);
        assert_eq!(ents.spiders.len(), 1);
    }

    #[test]
    fn test_each_category_has_own_delay() {
        let (mut ents, mut rng, mut events) = setup();
        ents.segments = Segment::wave();
        let mut sched = SpawnScheduler::new(0);

        sched.run(&mut ents, &mut rng, 5999, &mut events);
        assert_eq!(ents.spiders.len(), 1);
        assert!(ents.scorpions.is_empty());
        assert!(ents.fleas.is_empty());

        sched.run(&mut ents, &mut rng, 6000, &mut events);
        assert_eq!(ents.scorpions.len(), 1);
        assert!(ents.fleas.is_empty());

        sched.run(&mut ents, &mut rng, 7000, &mut events);
        assert_eq!(ents.fleas.len(), 1);
        assert_eq!(ents.segments.len(), WAVE_LENGTH);
    }

    #[test]
    fn test_escaped_spider_is_culled_and_restarts_timer() {
        let (mut ents, mut rng, mut events) = setup();
        let mut sched = SpawnScheduler::new(0);
        let mut spider = Spider::entering(false);
        spider.body.pos = IVec2::new(5, 500);
        ents.spiders.push(spider);

        sched.run(&mut ents, &mut rng, 9000, &mut events);
        assert!(ents.spiders.is_empty());
        assert_eq!(sched.last_death_ms(EnemyKind::Spider), 9000);
        assert!(events.contains(&GameEvent::EnemyExited {
            kind: EnemyKind::Spider
        }));

        // Culling tick never respawns in the same call
        sched.run(&mut ents, &mut rng, 9000 + SPIDER_RESPAWN_MS - 1, &mut events);
        assert!(ents.spiders.is_empty());
        sched.run(&mut ents, &mut rng, 9000 + SPIDER_RESPAWN_MS, &mut events);
        assert_eq!(ents.spiders.len(), 1);
    }

    #[test]
    fn test_wave_respawns_after_clear_delay() {
        let (mut ents, mut rng, mut events) = setup();
        let mut sched = SpawnScheduler::new(0);
        sched.record_death(EnemyKind::Centipede, 20_000);

        sched.run(&mut ents, &mut rng, 21_499, &mut events);
        assert!(ents.segments.is_empty());
        sched.run(&mut ents, &mut rng, 21_500, &mut events);
        assert_eq!(ents.segments.len(), WAVE_LENGTH);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::WaveSpawned).count(),
            1
        );
    }

    #[test]
    fn test_menu_roster_spiders_only() {
        let (mut ents, mut rng, mut events) = setup();
        let mut sched = SpawnScheduler::for_menu(0);
        sched.run(&mut ents, &mut rng, 60_000, &mut events);
        assert_eq!(ents.spiders.len(), 1);
        assert!(ents.segments.is_empty());
        assert!(ents.fleas.is_empty());
        assert!(ents.scorpions.is_empty());
    }

    #[test]
    fn test_restart_auxiliaries() {
        let mut sched = SpawnScheduler::new(0);
        sched.restart_auxiliaries(4200);
        assert_eq!(sched.last_death_ms(EnemyKind::Spider), 4200);
        assert_eq!(sched.last_death_ms(EnemyKind::Flea), 4200);
        assert_eq!(sched.last_death_ms(EnemyKind::Scorpion), 4200);
        assert_eq!(sched.last_death_ms(EnemyKind::Centipede), 0);
    }
}
