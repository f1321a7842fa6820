//! Fixed-order simulation tick
//!
//! One call to [`tick`] is one frame of play: steer, fire, move, collide,
//! spawn, score, then the cooldown clock. The caller supplies the clock
//! reading so the whole step stays deterministic.

use super::collision::{self, CollisionReport};
use super::entities::{Bullet, Steering};
use super::mover;
use super::scoring;
use super::spawner::{self, SpawnReport};
use super::state::Session;
use crate::consts::*;

/// Held keys for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub steering: Steering,
    /// Fire key held
    pub fire: bool,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// A bullet left the ship
    pub fired: bool,
    pub collisions: CollisionReport,
    pub spawned: Option<SpawnReport>,
    /// Points awarded this tick
    pub scored: u32,
    /// Slots freed by culling
    pub culled: usize,
}

impl TickOutcome {
    /// The player was hit; the playthrough is over
    pub fn is_fatal(&self) -> bool {
        self.collisions.fatal.is_some()
    }

    pub fn refilled(&self) -> bool {
        self.collisions.package.is_some()
    }
}

/// Fire one bullet if ammo and cooldown allow it
fn try_fire(session: &mut Session) -> bool {
    if !session.can_fire() {
        return false;
    }
    let bullet = Bullet::fired_from(&session.player);
    let insertion = session.bullets.insert(bullet);
    if insertion.overwrote {
        log::debug!("Bullet slot {} overwritten", insertion.id.index());
    }
    session.ammo -= 1;
    session.shot_cooldown = BULLET_COOLDOWN;
    true
}

/// The cooldown drops by one each time a full second has passed since the
/// previous drop
fn decay_cooldown(session: &mut Session) {
    if session.now_ms > session.last_cooldown_ms + COOLDOWN_DECAY_MS {
        session.last_cooldown_ms = session.now_ms;
        session.shot_cooldown = session.shot_cooldown.saturating_sub(1);
    }
}

/// Advance a playthrough by one tick.
///
/// On a fatal collision the tick stops right there: nothing spawns, scores
/// or refills, and the caller is expected to end the playthrough.
pub fn tick(session: &mut Session, input: &TickInput, now_ms: u64) -> TickOutcome {
    session.now_ms = now_ms;
    session.ticks += 1;

    let mut outcome = TickOutcome::default();

    session.player.steer(input.steering);
    if input.fire {
        outcome.fired = try_fire(session);
    }

    mover::advance(session);

    outcome.collisions = collision::resolve(session);
    if outcome.is_fatal() {
        return outcome;
    }
    if outcome.refilled() {
        session.ammo += PACKAGE_REFILL;
        log::debug!("Package collected, ammo now {}", session.ammo);
    }

    outcome.spawned = spawner::update(session);
    outcome.scored = scoring::award_dodges(session);
    outcome.culled = mover::cull(session);

    decay_cooldown(session);
    outcome
}

/// Background animation for the menu screens: asteroids spawn and drift,
/// nothing collides or scores
pub fn attract_tick(session: &mut Session, now_ms: u64) {
    session.now_ms = now_ms;
    session.ticks += 1;
    spawner::update(session);
    mover::advance(session);
    mover::cull(session);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Asteroid, Package};
    use crate::sim::state::Difficulty;
    use crate::sim::store::AllocPolicy;

    fn session() -> Session {
        Session::new(1, Difficulty::Easy, AllocPolicy::RoundRobin, 0)
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_asteroid_scores_once_after_passing_player_row() {
        let mut s = session();
        let a = s.asteroids.insert(Asteroid::new(0.0, 0.0, 40.0, 1.0)).id;
        let idle = TickInput::default();

        // Clock frozen at the start: no spawns and no speed ramp
        for _ in 0..700 {
            let outcome = tick(&mut s, &idle, 0);
            assert!(!outcome.is_fatal());
            assert_eq!(outcome.scored, 0);
        }
        assert_eq!(s.asteroids.get(a).unwrap().rect.y(), 700.0);
        assert_eq!(s.score, 0);

        assert_eq!(tick(&mut s, &idle, 0).scored, 1);
        assert_eq!(s.score, 1);
        for _ in 0..50 {
            tick(&mut s, &idle, 0);
        }
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_fire_consumes_ammo_and_sets_cooldown() {
        let mut s = session();
        let outcome = tick(&mut s, &fire(), 0);
        assert!(outcome.fired);
        assert_eq!(s.ammo, STARTING_AMMO - 1);
        assert_eq!(s.shot_cooldown, BULLET_COOLDOWN);
        assert_eq!(s.bullets.active_count(), 1);

        // Held fire key does nothing while cooling down
        assert!(!tick(&mut s, &fire(), 10).fired);
        assert_eq!(s.bullets.active_count(), 1);
    }

    #[test]
    fn test_fire_with_no_ammo_does_nothing() {
        let mut s = session();
        s.ammo = 0;
        let outcome = tick(&mut s, &fire(), 0);
        assert!(!outcome.fired);
        assert_eq!(s.bullets.active_count(), 0);
        assert_eq!(s.shot_cooldown, 0);
        assert_eq!(s.ammo, 0);
    }

    #[test]
    fn test_cooldown_decays_once_per_second() {
        let mut s = session();
        tick(&mut s, &fire(), 0);
        assert_eq!(s.shot_cooldown, 2);

        tick(&mut s, &TickInput::default(), 1_000);
        assert_eq!(s.shot_cooldown, 2);
        tick(&mut s, &TickInput::default(), 1_001);
        assert_eq!(s.shot_cooldown, 1);
        tick(&mut s, &TickInput::default(), 1_500);
        assert_eq!(s.shot_cooldown, 1);
        tick(&mut s, &TickInput::default(), 2_002);
        assert_eq!(s.shot_cooldown, 0);
        assert!(tick(&mut s, &fire(), 2_010).fired);
    }

    #[test]
    fn test_fatal_tick_stops_before_refill() {
        let mut s = session();
        let player = s.player.rect;
        s.asteroids
            .insert(Asteroid::new(player.x(), player.y() - 10.0, 50.0, 1.0));
        s.packages.insert(Package::new(player.x(), player.y()));

        let outcome = tick(&mut s, &TickInput::default(), 0);
        assert!(outcome.is_fatal());
        assert_eq!(s.ammo, STARTING_AMMO);
    }

    #[test]
    fn test_counted_asteroid_past_field_edge_is_still_fatal() {
        let mut s = session();
        // Ship parked at its lowest row, bottom edge at 802
        s.player.rect.pos = glam::Vec2::new(400.0, PLAYER_MAX_BOTTOM - PLAYER_HEIGHT);
        let a = s
            .asteroids
            .insert(Asteroid::new(467.0, FIELD_HEIGHT - 0.5, 50.0, 1.0))
            .id;
        s.asteroids.get_mut(a).unwrap().visible = false;

        // Just right of the ship: no overlap yet, and it must stay live
        let outcome = tick(&mut s, &TickInput::default(), 0);
        assert!(!outcome.is_fatal());
        assert!(s.asteroids.is_active(a));

        let right = TickInput {
            steering: Steering {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let outcome = tick(&mut s, &right, 0);
        assert_eq!(outcome.collisions.fatal, Some(a));
    }

    #[test]
    fn test_overlapping_packages_refill_once_per_tick() {
        let mut s = session();
        let player = s.player.rect;
        s.packages.insert(Package::new(player.x(), player.y() - 2.0));
        s.packages.insert(Package::new(player.x() + 4.0, player.y() - 2.0));

        let outcome = tick(&mut s, &TickInput::default(), 0);
        assert!(outcome.refilled());
        assert_eq!(s.ammo, STARTING_AMMO + PACKAGE_REFILL);
        assert_eq!(s.packages.active_count(), 1);
    }

    #[test]
    fn test_shot_destroys_light_asteroid_which_then_scores() {
        let mut s = session();
        let player = s.player.rect;
        // Bottom edge lands one row above the ship after the first fall step,
        // overlapping the fresh bullet but not the player
        let a = s
            .asteroids
            .insert(Asteroid::new(player.x() + 10.0, player.y() - 52.0, 50.0, 1.0))
            .id;

        let outcome = tick(&mut s, &fire(), 0);
        assert!(!outcome.is_fatal());
        assert_eq!(outcome.collisions.destroyed, vec![a]);
        assert_eq!(outcome.scored, 0);

        // Collapsed one row above the player, it keeps falling and scores
        // once its row passes the player's
        assert_eq!(tick(&mut s, &TickInput::default(), 0).scored, 0);
        let outcome = tick(&mut s, &TickInput::default(), 0);
        assert!(!outcome.is_fatal());
        assert_eq!(outcome.scored, 1);
    }

    #[test]
    fn test_same_seed_and_inputs_replay_identically() {
        fn run(seed: u64) -> (u32, u32, Vec<crate::sim::rect::Rect>) {
            let mut s = Session::new(seed, Difficulty::Normal, AllocPolicy::RoundRobin, 0);
            for i in 0..3_000u64 {
                let input = TickInput {
                    steering: Steering {
                        left: i % 400 < 200,
                        right: i % 400 >= 200,
                        ..Default::default()
                    },
                    fire: i % 50 == 0,
                };
                if tick(&mut s, &input, i * 7).is_fatal() {
                    break;
                }
            }
            let rects = s.asteroids.iter().map(|(_, a)| a.rect).collect();
            (s.score, s.ammo, rects)
        }

        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn test_attract_tick_spawns_without_scoring() {
        let mut s = session();
        for i in 0..2_000u64 {
            attract_tick(&mut s, i * 10);
        }
        assert!(s.asteroids_spawned > 0);
        assert_eq!(s.score, 0);
    }
}
