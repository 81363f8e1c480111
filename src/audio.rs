//! Audio boundary
//!
//! The simulation never touches a sound device. It talks to an [`AudioService`]
//! injected into the game at construction. [`Buzzer`] is the stock service: it
//! plays cues through a [`Synth`] back-end and schedules repeated cues against
//! the frame counter, which is what the failure sequences wait on.

use crate::Frame;

/// Sound cues used by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Enemy lanes stepped forward
    Tick,
    /// Avatar moved under player control
    Move,
    /// One point added to the displayed score
    Score,
    /// Failure (bite or fall), usually repeated
    Lost,
}

/// Everything the game needs from the audio layer
pub trait AudioService {
    /// Play a cue right away (fire-and-forget)
    fn play(&mut self, cue: Cue);

    /// Play `cue` now, then `count - 1` more times, `delay` frames apart
    fn repeat(&mut self, cue: Cue, count: u8, delay: u8, now: Frame);

    /// True once the last repeat sequence has fully played out
    fn has_finished_repeating(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;

    /// Advance the repeat scheduler (once per frame)
    fn update(&mut self, now: Frame);
}

/// Sound generator behind a [`Buzzer`]
pub trait Synth {
    fn emit(&mut self, cue: Cue);
}

/// Synth that produces no sound (headless runs, native builds)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSynth;

impl Synth for NullSynth {
    fn emit(&mut self, cue: Cue) {
        log::trace!("cue {:?}", cue);
    }
}

/// Frame-driven cue player with a single repeat channel
#[derive(Debug)]
pub struct Buzzer<S: Synth> {
    synth: S,
    /// Cue being repeated, if any
    to_repeat: Option<Cue>,
    /// Plays still owed by the current repeat
    remaining: u8,
    /// Frame of the last repeated play
    timer: Frame,
    /// Frames between two repeated plays
    delay: u8,
    muted: bool,
    finished: bool,
}

impl Default for Buzzer<NullSynth> {
    fn default() -> Self {
        Self::new(NullSynth)
    }
}

impl<S: Synth> Buzzer<S> {
    pub fn new(synth: S) -> Self {
        Self {
            synth,
            to_repeat: None,
            remaining: 0,
            timer: 0,
            delay: 0,
            muted: false,
            finished: false,
        }
    }

    /// Access the back-end (volume changes and the like)
    pub fn synth_mut(&mut self) -> &mut S {
        &mut self.synth
    }
}

impl<S: Synth> AudioService for Buzzer<S> {
    fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        self.synth.emit(cue);
    }

    fn repeat(&mut self, cue: Cue, count: u8, delay: u8, now: Frame) {
        self.play(cue);
        self.to_repeat = Some(cue);
        self.remaining = count.saturating_sub(1);
        self.timer = now;
        self.delay = delay;
        self.finished = false;
    }

    fn has_finished_repeating(&self) -> bool {
        self.finished
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn update(&mut self, now: Frame) {
        let Some(cue) = self.to_repeat else { return };
        if now.saturating_sub(self.timer) <= Frame::from(self.delay) {
            return;
        }
        if self.remaining > 0 {
            let remaining = self.remaining;
            self.repeat(cue, remaining, self.delay, now);
        } else if !self.finished {
            self.finished = true;
            self.to_repeat = None;
        }
    }
}

/// Web Audio square-wave synth (browser builds)
#[cfg(target_arch = "wasm32")]
pub use web::WebSynth;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Cue, Synth};

    /// Procedural LCD-style beeps - no sample files
    pub struct WebSynth {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
    }

    impl Default for WebSynth {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebSynth {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        fn volume(&self) -> f32 {
            self.master_volume * self.sfx_volume
        }

        /// Create a square oscillator wired through a gain node
        fn create_osc(&self, ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Square);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One square blip sliding from `from` to `to` Hz over `secs`
        fn blip(&self, ctx: &AudioContext, from: f32, to: f32, secs: f64, level: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, from) else {
                return;
            };
            let t = ctx.current_time();
            let vol = self.volume() * level;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + secs)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + secs)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + secs + 0.02).ok();
        }
    }

    impl Synth for WebSynth {
        fn emit(&mut self, cue: Cue) {
            if self.volume() <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Tick => self.blip(ctx, 1800.0, 1200.0, 0.03, 0.3),
                Cue::Move => self.blip(ctx, 900.0, 700.0, 0.05, 0.35),
                Cue::Score => self.blip(ctx, 2200.0, 2200.0, 0.03, 0.3),
                Cue::Lost => self.blip(ctx, 440.0, 330.0, 0.25, 0.5),
            }
        }
    }
}
