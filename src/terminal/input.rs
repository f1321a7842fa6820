//! Crossterm key events to per-tick input snapshots
//!
//! Terminals that support the kitty keyboard protocol report key releases,
//! so a held key stays held until its release arrives. Everywhere else only
//! presses (and auto-repeat presses) are delivered, and a key counts as held
//! for [`HOLD_WINDOW_MS`] after the last one seen.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::frame::FrameInput;
use crate::sim::{Steering, TickInput};

/// How long a press keeps a key held when releases are not reported (ms).
/// Long enough to bridge the initial auto-repeat delay of most terminals.
pub const HOLD_WINDOW_MS: u64 = 200;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Confirm,
    Escape,
}

impl GameKey {
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(GameKey::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameKey::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameKey::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameKey::Right),
            KeyCode::Char(' ') => Some(GameKey::Fire),
            KeyCode::Enter => Some(GameKey::Confirm),
            KeyCode::Esc => Some(GameKey::Escape),
            _ => None,
        }
    }
}

/// Accumulates key events between ticks
#[derive(Debug)]
pub struct KeyTracker {
    /// Whether the terminal reports releases
    release_events: bool,
    /// Held keys and when each was last pressed (ms)
    held: HashMap<GameKey, u64>,
    /// Keys that went down since the last snapshot
    edges: Vec<GameKey>,
    close: bool,
}

impl KeyTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            held: HashMap::new(),
            edges: Vec::new(),
            close: false,
        }
    }

    pub fn handle(&mut self, key: KeyEvent, now_ms: u64) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            log::info!("Ctrl-C received");
            self.close = true;
            return;
        }

        let Some(game_key) = GameKey::from_code(key.code) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press => {
                // Auto-repeat arrives as plain presses when releases are not reported
                if self.release_events || !self.held.contains_key(&game_key) {
                    self.edges.push(game_key);
                }
                self.held.insert(game_key, now_ms);
            }
            KeyEventKind::Repeat => {
                self.held.insert(game_key, now_ms);
            }
            KeyEventKind::Release => {
                self.held.remove(&game_key);
            }
        }
    }

    fn is_held(&self, key: GameKey) -> bool {
        self.held.contains_key(&key)
    }

    /// Build the input for one tick and clear the edge-triggered state
    pub fn snapshot(&mut self, now_ms: u64) -> FrameInput {
        if !self.release_events {
            self.held
                .retain(|_, pressed| now_ms.saturating_sub(*pressed) <= HOLD_WINDOW_MS);
        }

        let pressed = |key| self.edges.contains(&key);
        let input = FrameInput {
            keys: TickInput {
                steering: Steering {
                    up: self.is_held(GameKey::Up),
                    down: self.is_held(GameKey::Down),
                    left: self.is_held(GameKey::Left),
                    right: self.is_held(GameKey::Right),
                },
                fire: self.is_held(GameKey::Fire),
            },
            up_pressed: pressed(GameKey::Up),
            down_pressed: pressed(GameKey::Down),
            confirm_pressed: pressed(GameKey::Confirm),
            escape_pressed: pressed(GameKey::Escape),
            close_requested: self.close,
        };
        self.edges.clear();
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_press_is_an_edge_once() {
        let mut keys = KeyTracker::new(true);
        keys.handle(event(KeyCode::Down, KeyEventKind::Press), 0);

        let first = keys.snapshot(10);
        assert!(first.down_pressed);
        assert!(first.keys.steering.down);

        let second = keys.snapshot(20);
        assert!(!second.down_pressed);
        assert!(second.keys.steering.down);
    }

    #[test]
    fn test_release_ends_hold() {
        let mut keys = KeyTracker::new(true);
        keys.handle(event(KeyCode::Char(' '), KeyEventKind::Press), 0);
        assert!(keys.snapshot(5_000).keys.fire);

        keys.handle(event(KeyCode::Char(' '), KeyEventKind::Release), 5_001);
        assert!(!keys.snapshot(5_002).keys.fire);
    }

    #[test]
    fn test_hold_window_expires_without_releases() {
        let mut keys = KeyTracker::new(false);
        keys.handle(event(KeyCode::Left, KeyEventKind::Press), 100);
        assert!(keys.snapshot(100 + HOLD_WINDOW_MS).keys.steering.left);
        assert!(!keys.snapshot(101 + HOLD_WINDOW_MS).keys.steering.left);
    }

    #[test]
    fn test_auto_repeat_extends_hold_without_new_edges() {
        let mut keys = KeyTracker::new(false);
        keys.handle(event(KeyCode::Up, KeyEventKind::Press), 0);
        assert!(keys.snapshot(10).up_pressed);

        keys.handle(event(KeyCode::Up, KeyEventKind::Press), 150);
        keys.handle(event(KeyCode::Up, KeyEventKind::Press), 300);
        let input = keys.snapshot(400);
        assert!(input.keys.steering.up);
        assert!(!input.up_pressed);
    }

    #[test]
    fn test_ctrl_c_requests_close() {
        let mut keys = KeyTracker::new(false);
        keys.handle(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            0,
        );
        let input = keys.snapshot(1);
        assert!(input.close_requested);
        assert!(!input.keys.fire);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut keys = KeyTracker::new(true);
        keys.handle(event(KeyCode::Char('x'), KeyEventKind::Press), 0);
        assert_eq!(keys.snapshot(1), FrameInput::default());
    }

    #[test]
    fn test_enter_and_escape_are_edges() {
        let mut keys = KeyTracker::new(true);
        keys.handle(event(KeyCode::Enter, KeyEventKind::Press), 0);
        keys.handle(event(KeyCode::Esc, KeyEventKind::Press), 0);
        let input = keys.snapshot(1);
        assert!(input.confirm_pressed);
        assert!(input.escape_pressed);
    }
}
