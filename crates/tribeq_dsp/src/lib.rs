//! tribeq DSP - Three-Band Equalizer Engine
//!
//! This crate provides the audio processing core for tribeq, including:
//! - Low shelf / mid peaking / high shelf cascade using BiQuad filters
//! - RBJ cookbook coefficient derivation that is exactly flat at 0 dB
//! - 16-bit PCM and normalized float sample formats with range limiting
//! - Zero-allocation processing path
//!
//! # Architecture
//!
//! ```text
//!  caller PCM ──decode──▶ low shelf ──▶ mid peak ──▶ high shelf ──encode──▶ caller PCM
//!   (i16/f32)     f32      (300 Hz)     (1 kHz)      (3 kHz)     clamp     (i16/f32)
//! ```
//!
//! The DSP chain follows a strict "no allocation in audio callback" rule.
//! Filter history is sized when the instance is created or reconfigured.
//!
//! # Threading
//!
//! A [`ThreeBandEq`] is not internally synchronized. Every mutator takes
//! `&mut self`, so sharing one instance between a control thread and an
//! audio thread needs an external ordering discipline (a lock, or a command
//! queue drained between buffers). Independent instances share no state.

mod coefficients;
mod eq;
mod error;
mod presets;
mod sample;

pub use coefficients::{
    Band, BandType, CoefficientSet, SectionCoefficients, BAND_COUNT, HIGH_SHELF_HZ, LOW_SHELF_HZ,
    MID_PEAK_HZ, MID_PEAK_Q, SHELF_Q,
};
pub use eq::{
    ThreeBandEq, ThreeBandEqF32, ThreeBandEqI16, DEFAULT_CHANNELS, MAX_CHANNELS, MAX_GAIN_DB,
    MAX_SAMPLE_RATE, MIN_GAIN_DB, MIN_SAMPLE_RATE,
};
pub use error::DspError;
pub use presets::{find_preset, Preset, PRESETS};
pub use sample::{Sample, SampleFormat, I16_FULL_SCALE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Verify all public types are accessible
        let _eq = ThreeBandEqF32::new(48000).unwrap();
        let _pcm = ThreeBandEqI16::new(44100).unwrap();
        assert_eq!(PRESETS[0].0, "Flat");
    }
}
