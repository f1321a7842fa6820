//! Collision resolution between the player, bullets, asteroids and packages
//!
//! Asteroids are processed in slot order. For each one the player overlap is
//! checked first, so a fatal collision ends the scan even if earlier
//! asteroids were destroyed during the same pass.

use super::entities::{Asteroid, Bullet, Package};
use super::rect::Rect;
use super::state::Session;
use super::store::{SlotArena, SlotId};

/// Outcome of one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Asteroid that hit the player, ending the playthrough
    pub fatal: Option<SlotId>,
    /// Bullets consumed by asteroids this pass
    pub bullet_hits: u32,
    /// Asteroids whose HP reached zero this pass
    pub destroyed: Vec<SlotId>,
    /// Package the player picked up
    pub package: Option<SlotId>,
}

/// Find the first bullet overlapping `asteroid`, consume it and apply one
/// point of damage. At most one bullet per asteroid per pass.
/// Returns true if a bullet hit.
fn strike_with_first_bullet(asteroid: &mut Asteroid, bullets: &mut SlotArena<Bullet>) -> bool {
    let target = asteroid.rect;
    let hit = bullets
        .iter()
        .find(|(_, b)| b.rect.intersects(&target))
        .map(|(id, _)| id);

    let Some(id) = hit else {
        return false;
    };

    if let Some(bullet) = bullets.get_mut(id) {
        bullet.rect = Rect::ZERO;
    }
    bullets.deactivate(id);
    asteroid.strike();
    true
}

/// First active package overlapping the player, removed from play
pub fn pickup_package(player: &Rect, packages: &mut SlotArena<Package>) -> Option<SlotId> {
    let id = packages
        .iter()
        .find(|(_, p)| p.rect.intersects(player))
        .map(|(id, _)| id)?;

    if let Some(package) = packages.get_mut(id) {
        package.rect = Rect::ZERO;
    }
    packages.deactivate(id);
    Some(id)
}

/// Run every collision test for this tick.
///
/// A destroyed asteroid collapses to zero size one pixel above the player's
/// row; it keeps falling and is scored once it passes the player.
pub fn resolve(session: &mut Session) -> CollisionReport {
    let mut report = CollisionReport::default();
    let player = session.player.rect;
    let bullets = &mut session.bullets;

    for (id, asteroid) in session.asteroids.iter_mut() {
        if asteroid.rect.intersects(&player) {
            report.fatal = Some(id);
            return report;
        }

        if strike_with_first_bullet(asteroid, bullets) {
            report.bullet_hits += 1;
            if asteroid.hp == 0 {
                asteroid.rect.collapse_at(0.0, player.y() - 1.0);
                report.destroyed.push(id);
            }
        }
    }

    report.package = pickup_package(&player, &mut session.packages);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Difficulty;
    use crate::sim::store::AllocPolicy;

    fn session() -> Session {
        Session::new(1, Difficulty::Easy, AllocPolicy::RoundRobin, 0)
    }

    fn bullet_at(x: f32, y: f32) -> Bullet {
        Bullet {
            rect: Rect::square(x, y, BULLET_SIZE),
        }
    }

    #[test]
    fn test_bullet_hit_decrements_hp_and_consumes_bullet() {
        let mut s = session();
        let a = s.asteroids.insert(Asteroid::new(100.0, 100.0, 80.0, 1.0)).id;
        let b = s.bullets.insert(bullet_at(120.0, 150.0)).id;

        let report = resolve(&mut s);
        assert_eq!(report.bullet_hits, 1);
        assert!(report.destroyed.is_empty());
        let asteroid = s.asteroids.get(a).unwrap();
        assert_eq!(asteroid.hp, 1);
        assert!(asteroid.hit);
        assert!(!s.bullets.is_active(b));
    }

    #[test]
    fn test_one_bullet_per_asteroid_per_pass() {
        let mut s = session();
        let a = s.asteroids.insert(Asteroid::new(100.0, 100.0, 80.0, 1.0)).id;
        s.bullets.insert(bullet_at(110.0, 110.0));
        s.bullets.insert(bullet_at(130.0, 130.0));

        let report = resolve(&mut s);
        assert_eq!(report.bullet_hits, 1);
        assert_eq!(s.asteroids.get(a).unwrap().hp, 1);
        assert_eq!(s.bullets.active_count(), 1);
    }

    #[test]
    fn test_heavy_asteroid_needs_two_hits() {
        let mut s = session();
        let a = s.asteroids.insert(Asteroid::new(100.0, 100.0, 80.0, 1.0)).id;

        s.bullets.insert(bullet_at(120.0, 120.0));
        assert!(resolve(&mut s).destroyed.is_empty());

        s.bullets.insert(bullet_at(120.0, 120.0));
        let report = resolve(&mut s);
        assert_eq!(report.destroyed, vec![a]);
        let asteroid = s.asteroids.get(a).unwrap();
        assert_eq!(asteroid.hp, 0);
        assert!(asteroid.is_destroyed());
        assert_eq!(asteroid.rect.y(), s.player.rect.y() - 1.0);
    }

    #[test]
    fn test_light_asteroid_needs_one_hit() {
        let mut s = session();
        let a = s.asteroids.insert(Asteroid::new(100.0, 100.0, 50.0, 1.0)).id;
        s.bullets.insert(bullet_at(110.0, 110.0));
        assert_eq!(resolve(&mut s).destroyed, vec![a]);
    }

    #[test]
    fn test_destroyed_asteroid_absorbs_no_more_bullets() {
        let mut s = session();
        s.asteroids.insert(Asteroid::new(100.0, 100.0, 50.0, 1.0));
        s.bullets.insert(bullet_at(110.0, 110.0));
        resolve(&mut s);

        // A bullet sitting where the collapsed asteroid now is
        let player_row = s.player.rect.y();
        s.bullets.insert(bullet_at(0.0, player_row - 5.0));
        let report = resolve(&mut s);
        assert_eq!(report.bullet_hits, 0);
        assert_eq!(s.bullets.active_count(), 1);
    }

    #[test]
    fn test_player_overlap_is_fatal() {
        let mut s = session();
        let player = s.player.rect;
        let a = s
            .asteroids
            .insert(Asteroid::new(player.x() + 10.0, player.y() + 10.0, 40.0, 1.0))
            .id;
        assert_eq!(resolve(&mut s).fatal, Some(a));
    }

    #[test]
    fn test_fatal_collision_wins_over_same_tick_destruction() {
        let mut s = session();
        let player = s.player.rect;

        // Slot 0: shot down this pass
        let doomed = s.asteroids.insert(Asteroid::new(100.0, 100.0, 50.0, 1.0)).id;
        s.bullets.insert(bullet_at(110.0, 110.0));
        // Slot 1: overlapping the player
        let killer = s
            .asteroids
            .insert(Asteroid::new(player.x(), player.y(), 40.0, 1.0))
            .id;

        let report = resolve(&mut s);
        assert_eq!(report.destroyed, vec![doomed]);
        assert_eq!(report.fatal, Some(killer));
    }

    #[test]
    fn test_fatal_check_precedes_bullet_on_same_asteroid() {
        let mut s = session();
        let player = s.player.rect;
        let a = s
            .asteroids
            .insert(Asteroid::new(player.x(), player.y() - 30.0, 50.0, 1.0))
            .id;
        let b = s.bullets.insert(bullet_at(player.x() + 5.0, player.y() - 25.0)).id;

        let report = resolve(&mut s);
        assert_eq!(report.fatal, Some(a));
        assert_eq!(report.bullet_hits, 0);
        assert!(s.bullets.is_active(b));
    }

    #[test]
    fn test_only_first_overlapping_package_is_taken() {
        let mut s = session();
        let player = s.player.rect;
        let first = s.packages.insert(Package::new(player.x(), player.y())).id;
        let second = s.packages.insert(Package::new(player.x() + 5.0, player.y())).id;

        let report = resolve(&mut s);
        assert_eq!(report.package, Some(first));
        assert!(!s.packages.is_active(first));
        assert!(s.packages.is_active(second));

        let report = resolve(&mut s);
        assert_eq!(report.package, Some(second));
    }

    #[test]
    fn test_no_package_pickup_after_fatal() {
        let mut s = session();
        let player = s.player.rect;
        s.asteroids.insert(Asteroid::new(player.x(), player.y(), 40.0, 1.0));
        let p = s.packages.insert(Package::new(player.x(), player.y())).id;

        let report = resolve(&mut s);
        assert!(report.fatal.is_some());
        assert_eq!(report.package, None);
        assert!(s.packages.is_active(p));
    }
}
