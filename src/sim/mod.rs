//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock readings are passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entities;
pub mod mover;
pub mod rect;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::CollisionReport;
pub use entities::{Asteroid, AsteroidVariant, Bullet, Package, Player, Steering};
pub use rect::{PixelRect, Rect};
pub use spawner::SpawnReport;
pub use state::{Difficulty, Session};
pub use store::{AllocPolicy, Insertion, SlotArena, SlotId};
pub use tick::{TickInput, TickOutcome, attract_tick, tick};
