//! Session state for one playthrough
//!
//! Everything the simulation mutates lives in [`Session`]. The frame
//! controller replaces it wholesale when a new playthrough starts, so there
//! is no reset bookkeeping scattered across modules.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Asteroid, Bullet, Package, Player};
use super::store::{AllocPolicy, SlotArena};
use crate::consts::*;

/// Difficulty level selected on the options screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Numeric level (0-2)
    pub fn level(self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Options screen caption
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "DIFFICULTY 1",
            Difficulty::Normal => "DIFFICULTY 2",
            Difficulty::Hard => "DIFFICULTY 3",
        }
    }

    /// Pause between ticks while playing
    pub fn frame_delay_ms(self) -> u64 {
        BASE_FRAME_DELAY_MS - FRAME_DELAY_STEP_MS * self.level() as u64
    }
}

/// Complete state of one playthrough
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub difficulty: Difficulty,
    pub player: Player,
    pub asteroids: SlotArena<Asteroid>,
    pub bullets: SlotArena<Bullet>,
    pub packages: SlotArena<Package>,
    /// Asteroids dodged
    pub score: u32,
    /// Bullets left to fire
    pub ammo: u32,
    /// Shots are blocked while non-zero
    pub shot_cooldown: u32,
    /// Clock reading when the playthrough began (ms)
    pub started_ms: u64,
    /// Clock reading of the latest tick (ms)
    pub now_ms: u64,
    pub last_spawn_ms: u64,
    pub last_cooldown_ms: u64,
    /// Asteroids spawned this playthrough
    pub asteroids_spawned: u64,
    /// Shared rotation added to every asteroid's drawn angle (degrees)
    pub rotation_offset: f32,
    /// Ticks simulated
    pub ticks: u64,
}

impl Session {
    pub fn new(seed: u64, difficulty: Difficulty, policy: AllocPolicy, now_ms: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            player: Player::default(),
            asteroids: SlotArena::new(ASTEROID_CAPACITY, policy),
            bullets: SlotArena::new(BULLET_CAPACITY, policy),
            packages: SlotArena::new(PACKAGE_CAPACITY, policy),
            score: 0,
            ammo: STARTING_AMMO,
            shot_cooldown: 0,
            started_ms: now_ms,
            now_ms,
            last_spawn_ms: now_ms,
            last_cooldown_ms: now_ms,
            asteroids_spawned: 0,
            rotation_offset: 0.0,
            ticks: 0,
        }
    }

    /// Milliseconds since the playthrough began
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.started_ms)
    }

    /// Whole seconds since the playthrough began (HUD time)
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms() / 1000
    }

    /// Whether a shot would be accepted right now
    pub fn can_fire(&self) -> bool {
        self.shot_cooldown == 0 && self.ammo > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(7, Difficulty::Normal, AllocPolicy::RoundRobin, 5_000);
        assert_eq!(session.ammo, STARTING_AMMO);
        assert_eq!(session.score, 0);
        assert_eq!(session.elapsed_ms(), 0);
        assert_eq!(session.asteroids.capacity(), ASTEROID_CAPACITY);
        assert_eq!(session.bullets.capacity(), BULLET_CAPACITY);
        assert_eq!(session.packages.capacity(), PACKAGE_CAPACITY);
        assert_eq!(session.asteroids.active_count(), 0);
        assert!(session.can_fire());
    }

    #[test]
    fn test_frame_delay_shrinks_with_difficulty() {
        assert_eq!(Difficulty::Easy.frame_delay_ms(), 10);
        assert_eq!(Difficulty::Normal.frame_delay_ms(), 7);
        assert_eq!(Difficulty::Hard.frame_delay_ms(), 4);
    }

    #[test]
    fn test_difficulty_levels_follow_option_order() {
        let levels: Vec<u32> = Difficulty::ALL.iter().map(|d| d.level()).collect();
        assert_eq!(levels, vec![0, 1, 2]);
        assert_eq!(Difficulty::Hard.label(), "DIFFICULTY 3");
    }
}
