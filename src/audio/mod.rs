//! Sound cues
//!
//! The controller only knows about [`SoundSink`]; the browser build plugs in
//! the Web Audio synthesizer, tests plug in a recorder.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap on jump
    Flap,
    /// Passed a pipe
    Score,
    /// Crashed into a pipe or the ground
    Hit,
    /// Crashed with a new personal best
    HighScore,
}

/// Anything that can play a cue
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);

    /// Output volume in 0..=1, where 0 silences every cue
    fn set_volume(&mut self, _volume: f32) {}
}

/// No-op sink for native builds
#[derive(Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Collects cues instead of playing them
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<SoundEffect>,
    pub muted: bool,
}

impl SoundSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            self.played.push(effect);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.muted = volume <= 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_volume_silences_recorder() {
        let mut sink = RecordingSink::default();
        sink.play(SoundEffect::Flap);
        sink.set_volume(0.0);
        sink.play(SoundEffect::Score);
        sink.set_volume(0.4);
        sink.play(SoundEffect::Hit);
        assert_eq!(sink.played, vec![SoundEffect::Flap, SoundEffect::Hit]);
    }
}
