//! Music and sound cues
//!
//! The frame controller talks to an [`AudioSink`]; each frontend supplies
//! its own. The browser build synthesizes everything with Web Audio
//! oscillators, the terminal build only logs.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Background music, one per screen group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Menu and options screens
    Menu,
    /// During play
    Game,
    /// Game-over screen
    GameOver,
}

impl Track {
    /// Whether the track repeats until replaced
    pub fn looping(self) -> bool {
        !matches!(self, Track::GameOver)
    }
}

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A bullet was fired
    Laser,
    /// Ammo package collected
    Pickup,
    /// Ship destroyed
    Crash,
}

/// Audio output used by the frame controller
pub trait AudioSink {
    /// Start `track`, replacing whatever music is playing
    fn play_music(&mut self, track: Track);

    /// Play a one-shot effect over the music
    fn play_cue(&mut self, cue: Cue);

    /// Called once per rendered frame so looping music can be topped up
    fn update(&mut self) {}
}

/// Audio sink that writes to the log instead of a device
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    current: Option<Track>,
}

impl LogAudio {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            current: None,
        }
    }

    /// Track most recently started
    pub fn current(&self) -> Option<Track> {
        self.current
    }
}

impl AudioSink for LogAudio {
    fn play_music(&mut self, track: Track) {
        self.current = Some(track);
        if !self.muted {
            log::debug!("Music: {:?} (looping: {})", track, track.looping());
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        if !self.muted {
            log::trace!("Cue: {:?}", cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_game_over_plays_once() {
        assert!(Track::Menu.looping());
        assert!(Track::Game.looping());
        assert!(!Track::GameOver.looping());
    }

    #[test]
    fn test_log_audio_tracks_current_music() {
        let mut audio = LogAudio::new(true);
        assert_eq!(audio.current(), None);
        audio.play_music(Track::Menu);
        audio.play_cue(Cue::Laser);
        audio.play_music(Track::Game);
        assert_eq!(audio.current(), Some(Track::Game));
    }
}
