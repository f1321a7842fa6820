//! Startup errors
//!
//! Gameplay itself is infallible; everything that can go wrong happens
//! before the first frame and is reported through [`StartupError`].

use thiserror::Error;

/// Failure to bring the game up. Startup stops at the first of these.
#[derive(Error, Debug)]
pub enum StartupError {
    /// One or more required resources are unavailable. Every missing item
    /// is listed, not just the first one found.
    #[error("missing required assets: {}", .0.join(", "))]
    MissingAssets(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("GPU initialization failed: {0}")]
    Gpu(String),

    #[error("logger initialization failed: {0}")]
    Logger(String),
}
