//! Frame controller
//!
//! Owns the screen state machine (Menu, Options, Playing, GameOver), the
//! current playthrough, and the background session that animates the menu
//! screens. Frontends feed it one [`FrameInput`] per tick together with the
//! clock and an [`AudioSink`], then build a scene from it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, Cue, Track};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Difficulty, Session, TickInput, attract_tick, tick};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Options,
    Playing,
    /// Entered at `since_ms`; returns to the menu on its own
    GameOver { since_ms: u64 },
}

/// Main menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Options,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Start, MenuItem::Options, MenuItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "START",
            MenuItem::Options => "OPTIONS",
            MenuItem::Quit => "QUIT",
        }
    }
}

/// Options screen entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsItem {
    Difficulty(Difficulty),
    Back,
}

impl OptionsItem {
    pub const ALL: [OptionsItem; 4] = [
        OptionsItem::Difficulty(Difficulty::Easy),
        OptionsItem::Difficulty(Difficulty::Normal),
        OptionsItem::Difficulty(Difficulty::Hard),
        OptionsItem::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OptionsItem::Difficulty(d) => d.label(),
            OptionsItem::Back => "BACK",
        }
    }
}

/// Selection cursor over a fixed-length menu. Moves wrap in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn up(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    pub fn down(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Input snapshot for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Held movement and fire keys
    pub keys: TickInput,
    /// Menu navigation, true only on the tick the key went down
    pub up_pressed: bool,
    pub down_pressed: bool,
    pub confirm_pressed: bool,
    pub escape_pressed: bool,
    /// Window or terminal asked to close
    pub close_requested: bool,
}

/// Whether the frontend should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Screen state machine plus the sessions it drives
pub struct FrameController {
    settings: Settings,
    screen: Screen,
    menu_cursor: Cursor,
    options_cursor: Cursor,
    /// Current or most recent playthrough
    session: Session,
    /// Background animation for the menu screens
    attract: Session,
    seeds: Pcg32,
    /// Survival time of the last finished playthrough
    final_secs: u64,
}

impl FrameController {
    pub fn new(settings: Settings, seed: u64, now_ms: u64) -> Self {
        let mut seeds = Pcg32::seed_from_u64(seed);
        let policy = settings.store_policy;
        let session = Session::new(seeds.random(), settings.difficulty, policy, now_ms);
        let attract = Session::new(seeds.random(), settings.difficulty, policy, now_ms);
        Self {
            settings,
            screen: Screen::Menu,
            menu_cursor: Cursor::new(MenuItem::ALL.len()),
            options_cursor: Cursor::new(OptionsItem::ALL.len()),
            session,
            attract,
            seeds,
            final_secs: 0,
        }
    }

    /// Begin on the main menu with its music
    pub fn start(&mut self, audio: &mut dyn AudioSink) {
        log::info!("Entering menu");
        audio.play_music(Track::Menu);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Session animating the menu background
    pub fn attract(&self) -> &Session {
        &self.attract
    }

    pub fn menu_cursor(&self) -> Cursor {
        self.menu_cursor
    }

    pub fn options_cursor(&self) -> Cursor {
        self.options_cursor
    }

    /// Survival time shown on the game-over screen
    pub fn final_secs(&self) -> u64 {
        self.final_secs
    }

    /// Pause between ticks for the current screen
    pub fn frame_delay_ms(&self) -> u64 {
        match self.screen {
            Screen::Playing => self.settings.difficulty.frame_delay_ms(),
            _ => BASE_FRAME_DELAY_MS,
        }
    }

    /// Advance one tick
    pub fn step(&mut self, input: &FrameInput, now_ms: u64, audio: &mut dyn AudioSink) -> Flow {
        if input.close_requested {
            log::info!("Close requested");
            return Flow::Exit;
        }

        match self.screen {
            Screen::Menu => self.step_menu(input, now_ms, audio),
            Screen::Options => self.step_options(input, now_ms),
            Screen::Playing => self.step_playing(input, now_ms, audio),
            Screen::GameOver { since_ms } => self.step_game_over(input, since_ms, now_ms, audio),
        }
    }

    fn step_menu(&mut self, input: &FrameInput, now_ms: u64, audio: &mut dyn AudioSink) -> Flow {
        attract_tick(&mut self.attract, now_ms);

        if input.escape_pressed {
            log::info!("Quit from menu");
            return Flow::Exit;
        }
        if input.up_pressed {
            self.menu_cursor.up();
        }
        if input.down_pressed {
            self.menu_cursor.down();
        }
        if input.confirm_pressed {
            match MenuItem::ALL[self.menu_cursor.index()] {
                MenuItem::Start => self.start_playthrough(now_ms, audio),
                MenuItem::Options => {
                    log::info!("Entering options");
                    self.options_cursor.reset();
                    self.screen = Screen::Options;
                }
                MenuItem::Quit => {
                    log::info!("Quit selected");
                    return Flow::Exit;
                }
            }
        }
        Flow::Continue
    }

    fn step_options(&mut self, input: &FrameInput, now_ms: u64) -> Flow {
        attract_tick(&mut self.attract, now_ms);

        if input.escape_pressed {
            self.leave_options();
            return Flow::Continue;
        }
        if input.up_pressed {
            self.options_cursor.up();
        }
        if input.down_pressed {
            self.options_cursor.down();
        }
        if input.confirm_pressed {
            match OptionsItem::ALL[self.options_cursor.index()] {
                OptionsItem::Difficulty(difficulty) => {
                    log::info!("Difficulty set to {}", difficulty.level() + 1);
                    self.settings.difficulty = difficulty;
                }
                OptionsItem::Back => self.leave_options(),
            }
        }
        Flow::Continue
    }

    fn leave_options(&mut self) {
        log::info!("Entering menu");
        self.settings.save();
        self.menu_cursor.reset();
        self.screen = Screen::Menu;
    }

    fn step_playing(&mut self, input: &FrameInput, now_ms: u64, audio: &mut dyn AudioSink) -> Flow {
        if input.escape_pressed {
            self.session.now_ms = now_ms;
            self.end_playthrough(now_ms, audio);
            return Flow::Continue;
        }

        let outcome = tick(&mut self.session, &input.keys, now_ms);
        if outcome.fired {
            audio.play_cue(Cue::Laser);
        }
        if outcome.refilled() {
            audio.play_cue(Cue::Pickup);
        }
        if outcome.is_fatal() {
            audio.play_cue(Cue::Crash);
            self.end_playthrough(now_ms, audio);
        }
        Flow::Continue
    }

    fn step_game_over(
        &mut self,
        input: &FrameInput,
        since_ms: u64,
        now_ms: u64,
        audio: &mut dyn AudioSink,
    ) -> Flow {
        let expired = now_ms.saturating_sub(since_ms) >= GAME_OVER_DURATION_MS;
        if expired || input.escape_pressed {
            log::info!("Entering menu");
            self.attract = Session::new(
                self.seeds.random(),
                self.settings.difficulty,
                self.settings.store_policy,
                now_ms,
            );
            self.menu_cursor.reset();
            self.screen = Screen::Menu;
            audio.play_music(Track::Menu);
        }
        Flow::Continue
    }

    /// Fresh session: entities, ammo, score, clocks and the player all reset
    fn start_playthrough(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        self.session = Session::new(
            self.seeds.random(),
            self.settings.difficulty,
            self.settings.store_policy,
            now_ms,
        );
        self.screen = Screen::Playing;
        log::info!(
            "Starting playthrough (difficulty {}, seed {})",
            self.settings.difficulty.level() + 1,
            self.session.seed
        );
        audio.play_music(Track::Game);
    }

    fn end_playthrough(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        self.final_secs = self.session.elapsed_secs();
        self.screen = Screen::GameOver { since_ms: now_ms };
        log::info!(
            "Game over: {} s survived, score {}, {} asteroids spawned",
            self.final_secs,
            self.session.score,
            self.session.asteroids_spawned
        );
        audio.play_music(Track::GameOver);
    }
}
