//! Collision detection and response
//!
//! Runs once per tick after every behavior has moved. Pairs are checked in a
//! fixed priority order; a laser is consumed by the first category it
//! touches, but inside that category every overlapping target is hit.
//!
//! 1. Laser vs centipede, mushroom, spider, flea, scorpion
//! 2. Mushroom vs centipede, spider, scorpion
//! 3. Player vs centipede, spider, flea

use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, Laser, Mushroom, Player, Segment};
use super::geom::Rect;
use super::spawn::EnemyKind;
use super::state::{EntitySet, GameEvent, GameState, ScoreKeeper};
use crate::consts::*;
use crate::snap_to_lattice;

/// Live members of `group` whose boxes overlap `rect`
fn hits<'a, E: Entity>(rect: Rect, group: &'a mut [E]) -> impl Iterator<Item = &'a mut E> + 'a {
    group
        .iter_mut()
        .filter(move |e| e.is_alive() && e.rect().overlaps(&rect))
}

/// Laser x centipede: every touched segment dies and leaves a mushroom.
/// Returns how many segments were destroyed.
pub fn laser_vs_segments(
    laser: &Laser,
    segments: &mut [Segment],
    mushrooms: &mut Vec<Mushroom>,
    score: &mut ScoreKeeper,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut killed = 0;
    for segment in hits(laser.rect(), segments) {
        segment.destroy();
        score.add(SEGMENT_POINTS);
        mushrooms.push(Mushroom::new(snap_to_lattice(segment.pos())));
        events.push(GameEvent::SegmentKilled);
        killed += 1;
    }
    killed
}

/// Laser x mushroom: each touched mushroom loses one health; emptying one
/// scores a point. Returns how many mushrooms absorbed the shot.
pub fn laser_vs_mushrooms(
    laser: &Laser,
    mushrooms: &mut [Mushroom],
    score: &mut ScoreKeeper,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut absorbed = 0;
    for mushroom in hits(laser.rect(), mushrooms) {
        if mushroom.damage() {
            score.add(MUSHROOM_POINTS);
            events.push(GameEvent::MushroomCleared);
        }
        absorbed += 1;
    }
    absorbed
}

/// Laser x spider/flea/scorpion: every touched enemy dies for its bounty
pub fn laser_vs_enemies<E: Entity>(
    laser: &Laser,
    kind: EnemyKind,
    enemies: &mut [E],
    score: &mut ScoreKeeper,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut killed = 0;
    for enemy in hits(laser.rect(), enemies) {
        enemy.destroy();
        score.add(kind.points());
        events.push(GameEvent::EnemyKilled { kind });
        killed += 1;
    }
    killed
}

/// Resolve one laser against all target categories in priority order.
/// Returns the category that consumed it, if any.
fn resolve_laser(
    laser: &mut Laser,
    entities: &mut EntitySet,
    score: &mut ScoreKeeper,
    events: &mut Vec<GameEvent>,
) -> Option<LaserTarget> {
    let EntitySet {
        segments,
        mushrooms,
        scorpions,
        spiders,
        fleas,
        ..
    } = entities;

    let target = if laser_vs_segments(laser, segments, mushrooms, score, events) > 0 {
        LaserTarget::Centipede
    } else if laser_vs_mushrooms(laser, mushrooms, score, events) > 0 {
        LaserTarget::Mushroom
    } else if laser_vs_enemies(laser, EnemyKind::Spider, spiders, score, events) > 0 {
        LaserTarget::Spider
    } else if laser_vs_enemies(laser, EnemyKind::Flea, fleas, score, events) > 0 {
        LaserTarget::Flea
    } else if laser_vs_enemies(laser, EnemyKind::Scorpion, scorpions, score, events) > 0 {
        LaserTarget::Scorpion
    } else {
        return None;
    };
    laser.destroy();
    Some(target)
}

/// Category that consumed a laser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserTarget {
    Centipede,
    Mushroom,
    Spider,
    Flea,
    Scorpion,
}

impl LaserTarget {
    /// Auxiliary enemy whose respawn timer a kill restarts. Segments are
    /// timed per wave, not per kill.
    pub fn respawn_kind(self) -> Option<EnemyKind> {
        match self {
            LaserTarget::Spider => Some(EnemyKind::Spider),
            LaserTarget::Flea => Some(EnemyKind::Flea),
            LaserTarget::Scorpion => Some(EnemyKind::Scorpion),
            LaserTarget::Centipede | LaserTarget::Mushroom => None,
        }
    }
}

/// Mushroom x centipede: touched segments step off the row, and pick up
/// poison from a poisonous mushroom
pub fn mushrooms_vs_segments(mushrooms: &[Mushroom], segments: &mut [Segment]) {
    for mushroom in mushrooms.iter().filter(|m| m.is_alive()) {
        for segment in hits(mushroom.rect(), segments) {
            segment.bump();
            if mushroom.poisonous {
                segment.poisoned = true;
            }
        }
    }
}

/// Mushroom x spider: each touching spider has a 1 in 3 chance to eat it
pub fn mushrooms_vs_spiders<E: Entity>(
    mushrooms: &mut [Mushroom],
    spiders: &mut [E],
    rng: &mut Pcg32,
) {
    for mushroom in mushrooms.iter_mut().filter(|m| m.is_alive()) {
        let touching = hits(mushroom.rect(), spiders).count();
        for _ in 0..touching {
            if rng.random_range(0..SPIDER_CHEW_ODDS) == 0 {
                mushroom.destroy();
                break;
            }
        }
    }
}

/// Mushroom x scorpion: touched mushrooms turn poisonous
pub fn mushrooms_vs_scorpions<E: Entity>(mushrooms: &mut [Mushroom], scorpions: &mut [E]) {
    for mushroom in mushrooms.iter_mut().filter(|m| m.is_alive()) {
        if hits(mushroom.rect(), scorpions).next().is_some() {
            mushroom.poisonous = true;
        }
    }
}

/// Player x (centipede, spider, flea)
pub fn player_is_hit(player: &Player, entities: &mut EntitySet) -> bool {
    let rect = player.rect();
    hits(rect, &mut entities.segments).next().is_some()
        || hits(rect, &mut entities.spiders).next().is_some()
        || hits(rect, &mut entities.fleas).next().is_some()
}

/// Collision pass for one round tick
pub fn resolve_collisions(state: &mut GameState, now_ms: u64) {
    let GameState {
        entities,
        score,
        rng,
        events,
        spawner,
        ..
    } = state;

    let mut lasers = std::mem::take(&mut entities.lasers);
    for laser in lasers.iter_mut().filter(|l| l.is_alive()) {
        let kind = resolve_laser(laser, entities, score, events)
            .and_then(LaserTarget::respawn_kind);
        if let Some(kind) = kind {
            spawner.record_death(kind, now_ms);
        }
    }
    entities.lasers = lasers;

    mushrooms_vs_segments(&entities.mushrooms, &mut entities.segments);
    mushrooms_vs_spiders(&mut entities.mushrooms, &mut entities.spiders, rng);
    mushrooms_vs_scorpions(&mut entities.mushrooms, &mut entities.scorpions);

    entities.prune();

    if player_is_hit(&state.player, &mut state.entities) {
        lose_life(state, now_ms);
    }
}

/// Collision pass for the attract screen: segments still deflect off mushrooms
pub fn resolve_menu_collisions(entities: &mut EntitySet) {
    mushrooms_vs_segments(&entities.mushrooms, &mut entities.segments);
}

/// Player was touched: spend a life and, unless that was the last one, reset
/// the field. Every repaired mushroom is worth a bonus.
pub fn lose_life(state: &mut GameState, now_ms: u64) {
    let lives_left = state.lives.lose_one();
    state.events.push(GameEvent::LifeLost { lives_left });
    log::debug!(
        "Life lost at tick {} ({} left, score {})",
        state.time_ticks,
        lives_left,
        state.score.value()
    );
    if lives_left == 0 {
        return;
    }

    let mut repaired = 0;
    for mushroom in state.entities.mushrooms.iter_mut() {
        if mushroom.heal() {
            state.score.add(MUSHROOM_REPAIR_POINTS);
            repaired += 1;
        }
        mushroom.poisonous = false;
    }
    if repaired > 0 {
        log::debug!("Repaired {} mushrooms", repaired);
    }

    state.entities.clear_enemies();
    state.entities.segments = Segment::wave();
    state.events.push(GameEvent::WaveSpawned);
    state
        .spawner
        .restart_auxiliaries(now_ms + LIFE_LOST_PAUSE_MS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Flea, Scorpion, Spider};
    use glam::IVec2;

    fn empty_round() -> GameState {
        let mut state = GameState::with_seed(1, 0);
        state.entities = EntitySet::default();
        state
    }

    fn segment_at(x: i32, y: i32) -> Segment {
        let mut seg = Segment::new(y, SEGMENT_SPEED);
        seg.body.pos.x = x;
        seg
    }

    #[test]
    fn test_laser_kills_segment_and_drops_mushroom() {
        let mut state = empty_round();
        state.entities.segments.push(segment_at(96, 204));
        state.entities.lasers.push(Laser::new(IVec2::new(96, 210)));

        resolve_collisions(&mut state, 0);

        assert_eq!(state.score.value(), SEGMENT_POINTS);
        assert!(state.entities.segments.is_empty());
        assert!(state.entities.lasers.is_empty());
        assert_eq!(state.entities.mushrooms.len(), 1);
        assert_eq!(state.entities.mushrooms[0].pos(), IVec2::new(90, 210));
        assert_eq!(state.events, vec![GameEvent::SegmentKilled]);
    }

    #[test]
    fn test_centipede_takes_priority_over_mushroom() {
        let mut state = empty_round();
        state.entities.segments.push(segment_at(100, 100));
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(100, 110)));
        state.entities.lasers.push(Laser::new(IVec2::new(100, 106)));

        resolve_collisions(&mut state, 0);

        assert_eq!(state.score.value(), SEGMENT_POINTS);
        let original = state
            .entities
            .mushrooms
            .iter()
            .find(|m| m.pos() == IVec2::new(100, 110));
        assert_eq!(original.map(|m| m.health), Some(MUSHROOM_HEALTH));
    }

    #[test]
    fn test_laser_consumed_by_first_category() {
        let mut state = empty_round();
        let mut spider = Spider::entering(true);
        spider.body.pos = IVec2::new(300, 500);
        state.entities.spiders.push(spider);
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(300, 510)));

        let mut laser = Laser::new(IVec2::new(300, 505));
        let target = resolve_laser(
            &mut laser,
            &mut state.entities,
            &mut state.score,
            &mut state.events,
        );
        assert_eq!(target, Some(LaserTarget::Mushroom));
        assert!(!laser.is_alive());
        assert!(state.entities.spiders[0].is_alive());

        let mut stray = Laser::new(IVec2::new(20, 20));
        let target = resolve_laser(
            &mut stray,
            &mut state.entities,
            &mut state.score,
            &mut state.events,
        );
        assert_eq!(target, None);
        assert!(stray.is_alive());
    }

    #[test]
    fn test_one_laser_hits_all_targets_in_category() {
        let mut state = empty_round();
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(100, 100)));
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(100, 115)));
        state.entities.lasers.push(Laser::new(IVec2::new(100, 108)));

        resolve_collisions(&mut state, 0);

        assert!(state.entities.lasers.is_empty());
        assert!(state.entities.mushrooms.iter().all(|m| m.health == 3));
    }

    #[test]
    fn test_mushroom_bonus_awarded_once() {
        let mut state = empty_round();
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(100, 100)));
        for _ in 0..6 {
            state.entities.lasers.push(Laser::new(IVec2::new(100, 100)));
        }

        resolve_collisions(&mut state, 0);

        assert_eq!(state.score.value(), MUSHROOM_POINTS);
        assert!(state.entities.mushrooms.is_empty());
        // Two lasers fly on once the mushroom is gone
        assert_eq!(state.entities.lasers.len(), 2);
    }

    #[test]
    fn test_auxiliary_bounties() {
        let mut state = empty_round();
        let mut spider = Spider::entering(true);
        spider.body.pos = IVec2::new(50, 300);
        let mut flea = Flea::in_column(10);
        flea.body.pos.y = 300;
        let scorpion = Scorpion::entering(false, 90);
        state.entities.spiders.push(spider);
        state.entities.fleas.push(flea);
        state.entities.scorpions.push(scorpion);
        state.entities.lasers.push(Laser::new(IVec2::new(50, 300)));
        state.entities.lasers.push(Laser::new(IVec2::new(210, 300)));
        state.entities.lasers.push(Laser::new(IVec2::new(467, 90)));

        resolve_collisions(&mut state, 0);

        assert_eq!(
            state.score.value(),
            SPIDER_POINTS + FLEA_POINTS + SCORPION_POINTS
        );
        assert_eq!(state.entities.len(), 0);
    }

    #[test]
    fn test_shooting_enemies_restarts_their_timers() {
        let mut state = empty_round();
        let mut spider = Spider::entering(true);
        spider.body.pos = IVec2::new(50, 300);
        state.entities.spiders.push(spider);
        state.entities.lasers.push(Laser::new(IVec2::new(50, 300)));
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(400, 400)));
        state.entities.lasers.push(Laser::new(IVec2::new(400, 400)));

        resolve_collisions(&mut state, 4321);

        assert_eq!(state.spawner.last_death_ms(EnemyKind::Spider), 4321);
        assert_eq!(state.spawner.last_death_ms(EnemyKind::Flea), 0);
        assert_eq!(state.spawner.last_death_ms(EnemyKind::Scorpion), 0);
        assert_eq!(state.spawner.last_death_ms(EnemyKind::Centipede), 0);
    }

    #[test]
    fn test_scorpion_poisons_and_poison_spreads() {
        let mut state = empty_round();
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(250, 90)));
        state.entities.scorpions.push(Scorpion::entering(true, 90));
        state.entities.scorpions[0].body.pos.x = 240;

        resolve_collisions(&mut state, 0);
        assert!(state.entities.mushrooms[0].poisonous);

        state.entities.scorpions.clear();
        state.entities.segments.push(segment_at(250, 80));
        resolve_collisions(&mut state, 0);
        assert!(state.entities.segments[0].poisoned);
        assert!(state.entities.segments[0].hit_mushroom);
    }

    #[test]
    fn test_spider_eventually_eats_mushroom() {
        let mut state = empty_round();
        state.entities.mushrooms.push(Mushroom::new(IVec2::new(50, 510)));
        let mut spider = Spider::entering(true);
        spider.body.pos = IVec2::new(50, 510);
        state.entities.spiders.push(spider);

        for _ in 0..100 {
            resolve_collisions(&mut state, 0);
        }
        assert!(state.entities.mushrooms.is_empty());
        assert_eq!(state.score.value(), 0);
    }

    #[test]
    fn test_player_hit_resets_field() {
        let mut state = empty_round();
        let mut damaged = Mushroom::new(IVec2::new(50, 50));
        damaged.health = 1;
        let mut poisoned = Mushroom::new(IVec2::new(90, 50));
        poisoned.poisonous = true;
        let mut also_damaged = Mushroom::new(IVec2::new(130, 50));
        also_damaged.health = 3;
        state.entities.mushrooms = vec![damaged, poisoned, also_damaged];
        state.entities.scorpions.push(Scorpion::entering(true, 210));
        let mut spider = Spider::entering(true);
        spider.body.pos = state.player.pos();
        state.entities.spiders.push(spider);

        resolve_collisions(&mut state, 1000);

        assert_eq!(state.lives.remaining(), STARTING_LIVES - 1);
        assert_eq!(state.score.value(), 2 * MUSHROOM_REPAIR_POINTS);
        assert!(state.entities.mushrooms.iter().all(|m| m.health == MUSHROOM_HEALTH));
        assert!(state.entities.mushrooms.iter().all(|m| !m.poisonous));
        assert!(state.entities.spiders.is_empty());
        assert!(state.entities.scorpions.is_empty());
        assert_eq!(state.entities.segments.len(), WAVE_LENGTH);
        assert_eq!(
            state.spawner.last_death_ms(EnemyKind::Spider),
            1000 + LIFE_LOST_PAUSE_MS
        );
    }

    #[test]
    fn test_last_life_skips_repair_bonus() {
        let mut state = empty_round();
        state.lives.lose_one();
        state.lives.lose_one();
        state.score.add(1234);
        let mut damaged = Mushroom::new(IVec2::new(50, 50));
        damaged.health = 2;
        state.entities.mushrooms.push(damaged);
        let mut flea = Flea::in_column(0);
        flea.body.pos = state.player.pos();
        state.entities.fleas.push(flea);

        resolve_collisions(&mut state, 0);

        assert!(state.lives.is_out());
        assert_eq!(state.score.value(), 1234);
        assert_eq!(state.entities.mushrooms[0].health, 2);
    }

    #[test]
    fn test_scorpion_does_not_hurt_player() {
        let mut state = empty_round();
        let mut scorpion = Scorpion::entering(true, 600);
        scorpion.body.pos = state.player.pos();
        state.entities.scorpions.push(scorpion);

        resolve_collisions(&mut state, 0);
        assert_eq!(state.lives.remaining(), STARTING_LIVES);
    }
}
