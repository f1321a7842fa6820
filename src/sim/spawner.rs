//! Asteroid and package spawning

use rand::Rng;

use super::entities::{Asteroid, AsteroidVariant, Package};
use super::state::{Difficulty, Session};
use super::store::SlotId;
use crate::consts::*;

/// The single package of a playthrough arrives with this asteroid index
pub const PACKAGE_MILESTONE: u64 = (ASTEROID_CAPACITY / 20) as u64;

/// What a spawn produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub asteroid: SlotId,
    /// A live asteroid was overwritten to make room
    pub overwrote: bool,
    pub package: Option<SlotId>,
}

/// Milliseconds that must pass between asteroid spawns. Shrinks with
/// difficulty and by one ms per elapsed second, never below zero.
pub fn spawn_interval_ms(difficulty: Difficulty, elapsed_ms: u64) -> u64 {
    let elapsed_secs = (elapsed_ms / 1000) as i64;
    let interval = BASE_SPAWN_INTERVAL_MS
        - SPAWN_INTERVAL_STEP_MS * difficulty.level() as i64
        - elapsed_secs;
    interval.max(0) as u64
}

/// True when enough time has passed since the previous spawn
pub fn spawn_due(session: &Session) -> bool {
    let since = session.now_ms.saturating_sub(session.last_spawn_ms);
    since > spawn_interval_ms(session.difficulty, session.elapsed_ms())
}

/// Roll a new asteroid above the top edge
pub fn random_asteroid(rng: &mut impl Rng) -> Asteroid {
    let size = rng.random_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE) as f32;
    let x = rng.random_range(0..1000) as f32;
    let y = -(rng.random_range(0..100) as f32) - 100.0;
    let speed = rng.random_range(900..=1400) as f32 / 1000.0;

    let mut asteroid = Asteroid::new(x, y, size, speed);
    asteroid.angle = rng.random_range(1..=360) as f32;
    asteroid.spin = rng.random_range(1..=40) as f32 / 100.0;
    asteroid.variant = AsteroidVariant::ALL[rng.random_range(0..AsteroidVariant::ALL.len())];
    asteroid
}

/// Roll a package above the top edge
pub fn random_package(rng: &mut impl Rng) -> Package {
    let x = rng.random_range(0..FIELD_WIDTH as u32) as f32;
    let y = -(rng.random_range(0..100) as f32) - 100.0;
    Package::new(x, y)
}

/// Spawn one asteroid now, plus the package if this is the milestone spawn
pub fn spawn_asteroid(session: &mut Session) -> SpawnReport {
    let asteroid = random_asteroid(&mut session.rng);
    let insertion = session.asteroids.insert(asteroid);
    if insertion.overwrote {
        log::debug!(
            "Asteroid slot {} overwritten while still live",
            insertion.id.index()
        );
    }

    let package = if session.asteroids_spawned == PACKAGE_MILESTONE {
        let package = random_package(&mut session.rng);
        let id = session.packages.insert(package).id;
        log::debug!("Package spawned in slot {}", id.index());
        Some(id)
    } else {
        None
    };
    session.asteroids_spawned += 1;

    SpawnReport {
        asteroid: insertion.id,
        overwrote: insertion.overwrote,
        package,
    }
}

/// Spawn an asteroid if the gate is open
pub fn update(session: &mut Session) -> Option<SpawnReport> {
    if !spawn_due(session) {
        return None;
    }
    session.last_spawn_ms = session.now_ms;
    Some(spawn_asteroid(session))
}
