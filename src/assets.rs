//! Required-resource manifest
//!
//! Each frontend declares what it cannot run without. [`AssetManifest::verify`]
//! checks every entry against a probe and reports all missing items in one
//! [`StartupError::MissingAssets`], so a broken page or a tiny terminal is
//! diagnosed in a single pass.

use std::fmt;

use crate::error::StartupError;

/// Something a frontend needs before the first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// DOM element with this id
    DomElement(&'static str),
    /// Terminal at least this many columns and rows
    TerminalSize { cols: u16, rows: u16 },
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::DomElement(id) => write!(f, "#{id}"),
            Requirement::TerminalSize { cols, rows } => {
                write!(f, "terminal of at least {cols}x{rows}")
            }
        }
    }
}

/// Element ids the browser page must provide
pub mod dom {
    pub const CANVAS: &str = "canvas";
    pub const HUD_STATUS: &str = "hud-status";
    pub const OVERLAY: &str = "overlay";
    /// One per menu line / banner line
    pub const OVERLAY_LINES: [&str; 4] = ["overlay-0", "overlay-1", "overlay-2", "overlay-3"];
}

/// Smallest terminal the canvas frontend will draw into
pub const MIN_TERMINAL_COLS: u16 = 60;
pub const MIN_TERMINAL_ROWS: u16 = 30;

/// Everything one frontend requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    pub requirements: Vec<Requirement>,
}

impl AssetManifest {
    pub fn browser() -> Self {
        let mut requirements = vec![
            Requirement::DomElement(dom::CANVAS),
            Requirement::DomElement(dom::HUD_STATUS),
            Requirement::DomElement(dom::OVERLAY),
        ];
        requirements.extend(dom::OVERLAY_LINES.into_iter().map(Requirement::DomElement));
        Self { requirements }
    }

    pub fn terminal() -> Self {
        Self {
            requirements: vec![Requirement::TerminalSize {
                cols: MIN_TERMINAL_COLS,
                rows: MIN_TERMINAL_ROWS,
            }],
        }
    }

    /// Check every requirement; `probe` returns true when one is satisfied
    pub fn verify(&self, probe: impl Fn(&Requirement) -> bool) -> Result<(), StartupError> {
        let missing: Vec<String> = self
            .requirements
            .iter()
            .filter(|req| !probe(req))
            .map(|req| req.to_string())
            .collect();

        if missing.is_empty() {
            log::info!("All {} required assets present", self.requirements.len());
            Ok(())
        } else {
            Err(StartupError::MissingAssets(missing))
        }
    }
}
