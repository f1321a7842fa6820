//! Native terminal frontend
//!
//! Owns the terminal for the lifetime of the game. Raw mode, the alternate
//! screen and (where supported) key release reporting are switched on by a
//! [`TerminalGuard`] and switched back off when it drops, whether the loop
//! returns, fails or panics. Each restore step runs even if an earlier one
//! fails.

pub mod canvas;
pub mod input;

use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use crate::assets::{AssetManifest, Requirement};
use crate::audio::LogAudio;
use crate::error::StartupError;
use crate::frame::{Flow, FrameController};
use crate::scene::Scene;
use crate::settings::Settings;

use input::KeyTracker;

/// Check the terminal against the manifest before touching its mode
fn verify_size() -> Result<(), StartupError> {
    let (cols, rows) = crossterm::terminal::size()?;
    log::info!("Terminal size {}x{}", cols, rows);
    AssetManifest::terminal().verify(|req| match req {
        Requirement::TerminalSize {
            cols: min_cols,
            rows: min_rows,
        } => cols >= *min_cols && rows >= *min_rows,
        Requirement::DomElement(_) => false,
    })
}

/// One undo action for terminal state
type RestoreStep<'a> = (&'static str, Box<dyn FnOnce() -> io::Result<()> + 'a>);

/// Run every step in order, logging failures instead of stopping at them.
/// Returns how many failed.
fn restore_all(steps: Vec<RestoreStep<'_>>) -> usize {
    let mut failed = 0;
    for (name, step) in steps {
        if let Err(e) = step() {
            log::warn!("Failed to {}: {}", name, e);
            failed += 1;
        }
    }
    failed
}

/// Terminal modes switched on for the game, undone on drop
struct TerminalGuard {
    release_events: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self, StartupError> {
        enable_raw_mode()?;
        // From here on, an early return drops the guard and restores
        let mut guard = Self {
            release_events: false,
        };
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        if matches!(supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.release_events = true;
        }
        log::info!("Key release events: {}", guard.release_events);
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut steps: Vec<RestoreStep<'_>> = Vec::new();
        if self.release_events {
            steps.push((
                "pop keyboard flags",
                Box::new(|| execute!(io::stdout(), PopKeyboardEnhancementFlags)),
            ));
        }
        steps.push(("disable raw mode", Box::new(disable_raw_mode)));
        steps.push((
            "leave alternate screen",
            Box::new(|| execute!(io::stdout(), LeaveAlternateScreen, Show)),
        ));
        restore_all(steps);
    }
}

/// Run the game until the player quits
pub fn run(settings: Settings) -> Result<(), StartupError> {
    verify_size()?;

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    game_loop(&mut terminal, settings, guard.release_events)
}

fn game_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    settings: Settings,
    release_events: bool,
) -> Result<(), StartupError> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    log::info!("Seed: {}", seed);

    let mut audio = LogAudio::new(settings.muted);
    let mut frames = FrameController::new(settings, seed, now_ms());
    frames.start(&mut audio);
    let mut keys = KeyTracker::new(release_events);
    let mut last_tick = now_ms();

    loop {
        // Drain input until the frame delay has passed
        let due = last_tick + frames.frame_delay_ms();
        let now = now_ms();
        if now < due {
            if event::poll(Duration::from_millis(due - now))? {
                if let Event::Key(key) = event::read()? {
                    keys.handle(key, now_ms());
                }
            }
            continue;
        }

        last_tick = now;
        let input = keys.snapshot(now);
        if frames.step(&input, now, &mut audio) == Flow::Exit {
            log::info!("Exiting");
            break;
        }

        let scene = Scene::build(&frames);
        terminal.draw(|frame| canvas::draw(frame, &scene))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn step<'a>(name: &'static str, f: impl FnOnce() -> io::Result<()> + 'a) -> RestoreStep<'a> {
        (name, Box::new(f))
    }

    #[test]
    fn test_restore_continues_past_failed_step() {
        let later_ran = Cell::new(false);
        let failed = restore_all(vec![
            step("pop keyboard flags", || Err(io::Error::other("not a tty"))),
            step("disable raw mode", || {
                later_ran.set(true);
                Ok(())
            }),
        ]);
        assert_eq!(failed, 1);
        assert!(later_ran.get());
    }

    #[test]
    fn test_restore_reports_every_failure() {
        let failed = restore_all(vec![
            step("a", || Err(io::Error::other("a"))),
            step("b", || Err(io::Error::other("b"))),
            step("c", || Ok(())),
        ]);
        assert_eq!(failed, 2);
    }
}
