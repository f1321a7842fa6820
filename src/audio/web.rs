//! Web Audio backend
//!
//! Procedurally generated music and effects - no external files needed!
//! Looping tracks are scheduled one phrase ahead of the audio clock and
//! topped up from [`AudioSink::update`].

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, Cue, Track};
use crate::settings::Settings;

/// One note of a music phrase: (frequency Hz, start beat, length in beats)
type Note = (f32, f64, f64);

/// Seconds per beat for every track
const BEAT: f64 = 0.25;

/// Schedule the next phrase when less than this much music is queued (s)
const LOOKAHEAD: f64 = 0.5;

const MENU_PHRASE: &[Note] = &[
    (220.0, 0.0, 2.0),
    (261.6, 2.0, 2.0),
    (329.6, 4.0, 2.0),
    (261.6, 6.0, 2.0),
    (196.0, 8.0, 2.0),
    (246.9, 10.0, 2.0),
    (293.7, 12.0, 2.0),
    (246.9, 14.0, 2.0),
];

const GAME_PHRASE: &[Note] = &[
    (110.0, 0.0, 0.5),
    (110.0, 1.0, 0.5),
    (130.8, 2.0, 0.5),
    (110.0, 3.0, 0.5),
    (146.8, 4.0, 0.5),
    (110.0, 5.0, 0.5),
    (130.8, 6.0, 0.5),
    (98.0, 7.0, 0.5),
];

const GAME_OVER_PHRASE: &[Note] = &[
    (392.0, 0.0, 1.5),
    (349.2, 2.0, 1.5),
    (311.1, 4.0, 1.5),
    (261.6, 6.0, 4.0),
];

fn phrase(track: Track) -> &'static [Note] {
    match track {
        Track::Menu => MENU_PHRASE,
        Track::Game => GAME_PHRASE,
        Track::GameOver => GAME_OVER_PHRASE,
    }
}

fn phrase_length(notes: &[Note]) -> f64 {
    notes
        .iter()
        .map(|(_, start, len)| (start + len) * BEAT)
        .fold(0.0, f64::max)
}

/// Browser audio output
pub struct WebAudio {
    ctx: Option<AudioContext>,
    music_volume: f32,
    sfx_volume: f32,
    current: Option<Track>,
    /// Audio-clock time up to which music is queued
    scheduled_until: f64,
    /// Queued music voices and their stop times
    voices: Vec<(OscillatorNode, f64)>,
}

impl WebAudio {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            music_volume: settings.effective_music_volume(),
            sfx_volume: settings.effective_sfx_volume(),
            current: None,
            scheduled_until: 0.0,
            voices: Vec::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn stop_music(&mut self) {
        for (osc, _) in self.voices.drain(..) {
            osc.stop().ok();
        }
        self.current = None;
    }

    /// Queue one full phrase of the current track starting at `start`
    fn schedule_phrase(&mut self, start: f64) {
        let (Some(ctx), Some(track)) = (&self.ctx, self.current) else {
            return;
        };
        let vol = self.music_volume;
        let osc_type = match track {
            Track::Menu => OscillatorType::Sine,
            Track::Game => OscillatorType::Triangle,
            Track::GameOver => OscillatorType::Sine,
        };

        let notes = phrase(track);
        for &(freq, beat, len) in notes {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                continue;
            };
            let t = start + beat * BEAT;
            let end = t + len * BEAT;
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, end)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.05).ok();
            self.voices.push((osc, end + 0.05));
        }
        self.scheduled_until = start + phrase_length(notes);
    }

    /// Laser - short falling zap
    fn play_laser(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 1200.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(1200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Pickup - rising ding
    fn play_pickup(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Crash - low boom with a crack on top
    fn play_crash(ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        if let Some((osc, gain)) = Self::create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }
        if let Some((osc, gain)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }
}

impl AudioSink for WebAudio {
    fn play_music(&mut self, track: Track) {
        self.stop_music();
        if self.music_volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let now = ctx.current_time();
        self.current = Some(track);
        self.schedule_phrase(now);
    }

    fn play_cue(&mut self, cue: Cue) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Laser => Self::play_laser(ctx, vol),
            Cue::Pickup => Self::play_pickup(ctx, vol),
            Cue::Crash => Self::play_crash(ctx, vol),
        }
    }

    fn update(&mut self) {
        let Some(now) = self.ctx.as_ref().map(|ctx| ctx.current_time()) else {
            return;
        };
        self.voices.retain(|(_, stop_at)| *stop_at > now);

        match self.current {
            Some(track) if track.looping() => {
                if self.scheduled_until - now < LOOKAHEAD {
                    let start = self.scheduled_until.max(now);
                    self.schedule_phrase(start);
                }
            }
            Some(_) if now >= self.scheduled_until => self.current = None,
            _ => {}
        }
    }
}
