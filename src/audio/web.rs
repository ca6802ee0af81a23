//! Web Audio synthesizer
//!
//! Procedurally generated cues, no sample files. Each cue is a short list of
//! enveloped oscillator sweeps.

use web_sys::{AudioContext, AudioContextState, OscillatorType};

use super::{SoundEffect, SoundSink};
use crate::settings::Settings;

/// One oscillator voice: a frequency sweep under an exponential decay
#[derive(Clone, Copy)]
struct Tone {
    wave: OscillatorType,
    from_hz: f32,
    to_hz: f32,
    /// Peak gain before master volume
    gain: f32,
    /// Seconds after the cue starts
    delay: f64,
    duration: f64,
}

impl Tone {
    const fn new(wave: OscillatorType, from_hz: f32, to_hz: f32, gain: f32) -> Self {
        Self {
            wave,
            from_hz,
            to_hz,
            gain,
            delay: 0.0,
            duration: 0.1,
        }
    }

    const fn at(mut self, delay: f64, duration: f64) -> Self {
        self.delay = delay;
        self.duration = duration;
        self
    }
}

const FLAP: &[Tone] = &[Tone::new(OscillatorType::Triangle, 320.0, 640.0, 0.25).at(0.0, 0.09)];

const SCORE: &[Tone] = &[
    Tone::new(OscillatorType::Sine, 880.0, 880.0, 0.3).at(0.0, 0.18),
    Tone::new(OscillatorType::Sine, 1320.0, 1320.0, 0.3).at(0.07, 0.18),
];

const HIT: &[Tone] = &[
    // Thud
    Tone::new(OscillatorType::Sine, 150.0, 40.0, 0.6).at(0.0, 0.25),
    // Descending buzz
    Tone::new(OscillatorType::Sawtooth, 400.0, 90.0, 0.2).at(0.0, 0.35),
];

/// Rising C major arpeggio, played after the hit
const FANFARE: &[Tone] = &[
    Tone::new(OscillatorType::Triangle, 523.0, 523.0, 0.25).at(0.30, 0.25),
    Tone::new(OscillatorType::Triangle, 659.0, 659.0, 0.25).at(0.39, 0.25),
    Tone::new(OscillatorType::Triangle, 784.0, 784.0, 0.25).at(0.48, 0.25),
    Tone::new(OscillatorType::Triangle, 1047.0, 1047.0, 0.25).at(0.57, 0.35),
];

fn cue(effect: SoundEffect) -> &'static [&'static [Tone]] {
    match effect {
        SoundEffect::Flap => &[FLAP],
        SoundEffect::Score => &[SCORE],
        SoundEffect::Hit => &[HIT],
        SoundEffect::HighScore => &[HIT, FANFARE],
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx
            && ctx.state() == AudioContextState::Suspended
        {
            let _ = ctx.resume();
        }
    }

    /// Schedule one voice. Returns `None` if any node call is rejected.
    fn voice(ctx: &AudioContext, tone: &Tone, vol: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let amp = ctx.create_gain().ok()?;
        osc.set_type(tone.wave);
        osc.connect_with_audio_node(&amp).ok()?;
        amp.connect_with_audio_node(&ctx.destination()).ok()?;

        let start = ctx.current_time() + tone.delay;
        let end = start + tone.duration;

        let freq = osc.frequency();
        freq.set_value_at_time(tone.from_hz, start).ok()?;
        if tone.to_hz != tone.from_hz {
            freq.exponential_ramp_to_value_at_time(tone.to_hz, end).ok()?;
        }

        let gain = amp.gain();
        gain.set_value_at_time(tone.gain * vol, start).ok()?;
        // Exponential ramps cannot reach zero
        gain.exponential_ramp_to_value_at_time(0.01, end).ok()?;

        osc.start_with_when(start).ok()?;
        osc.stop_with_when(end + 0.02).ok()
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        for layer in cue(effect) {
            for tone in layer.iter() {
                if Self::voice(ctx, tone, vol).is_none() {
                    log::debug!("Dropped {:?} voice", effect);
                }
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}
