//! Space Raider - a falling-asteroid arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity store, spawner, mover, collisions, scoring)
//! - `frame`: Menu/Options/Playing/GameOver state machine driving the simulation
//! - `scene`: Backend-neutral draw list built from the frame controller
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Music and sound cue sinks
//! - `assets`: Startup verification of required resources
//! - `terminal`: Native ratatui/crossterm frontend

pub mod assets;
pub mod audio;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

pub use error::StartupError;
pub use frame::{Flow, FrameController, FrameInput, Screen};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player ship size and speed (pixels per tick)
    pub const PLAYER_WIDTH: f32 = 66.0;
    pub const PLAYER_HEIGHT: f32 = 66.0;
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Distance of the player's spawn row from the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 100.0;
    /// Lowest row the ship's bottom edge can reach. Steering checks the
    /// bound before the step, so the ship may end one step past the field.
    pub const PLAYER_MAX_BOTTOM: f32 = FIELD_HEIGHT + PLAYER_SPEED;

    /// Bullet size and upward speed
    pub const BULLET_SIZE: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 4.0;
    /// Cooldown units set on each shot; one unit decays per second
    pub const BULLET_COOLDOWN: u32 = 2;
    /// Wall time between cooldown decays (ms)
    pub const COOLDOWN_DECAY_MS: u64 = 1000;

    /// Package size and downward speed
    pub const PACKAGE_SIZE: f32 = 75.0;
    pub const PACKAGE_SPEED: f32 = 2.0;
    /// Ammo granted per package pickup
    pub const PACKAGE_REFILL: u32 = 10;

    /// Slot capacities
    pub const ASTEROID_CAPACITY: usize = 200;
    pub const BULLET_CAPACITY: usize = 20;
    pub const PACKAGE_CAPACITY: usize = 5;

    /// Ammo at the start of each playthrough
    pub const STARTING_AMMO: u32 = 10;

    /// Asteroids larger than this take two hits
    pub const HEAVY_ASTEROID_SIZE: f32 = 70.0;
    /// Asteroid size range [min, max)
    pub const ASTEROID_MIN_SIZE: u32 = 30;
    pub const ASTEROID_MAX_SIZE: u32 = 100;

    /// Spawn interval: base minus a step per difficulty level, minus one ms per elapsed second
    pub const BASE_SPAWN_INTERVAL_MS: i64 = 300;
    pub const SPAWN_INTERVAL_STEP_MS: i64 = 50;

    /// Elapsed milliseconds per extra pixel/tick of asteroid fall speed
    pub const SPEED_RAMP_MS: f32 = 20_000.0;

    /// Shared asteroid rotation per tick (degrees)
    pub const ROTATION_OFFSET_STEP: f32 = 0.1;

    /// Bullets this far above the field are culled
    pub const BULLET_CULL_MARGIN: f32 = 200.0;

    /// Game-over screen duration (ms)
    pub const GAME_OVER_DURATION_MS: u64 = 4000;

    /// Frame pacing: base delay minus a step per difficulty level (ms)
    pub const BASE_FRAME_DELAY_MS: u64 = 10;
    pub const FRAME_DELAY_STEP_MS: u64 = 3;
}
