//! Three-Band Equalizer
//!
//! Low shelf → mid peak → high shelf cascade of BiQuad sections, one
//! independent filter history per channel.

use std::marker::PhantomData;

use biquad::{Biquad, DirectForm2Transposed};

use crate::coefficients::{Band, CoefficientSet, SectionCoefficients, BAND_COUNT};
use crate::error::DspError;
use crate::presets::Preset;
use crate::sample::Sample;

/// Lowest supported sample rate (Hz)
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest supported sample rate (Hz)
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Gain range in dB; setters clamp into it
pub const MIN_GAIN_DB: f32 = -96.0;
pub const MAX_GAIN_DB: f32 = 24.0;

/// Mono or stereo only
pub const MAX_CHANNELS: usize = 2;

/// Channel layout a fresh instance is configured for
pub const DEFAULT_CHANNELS: usize = 2;

/// Filter history for one channel, in cascade order
type ChannelFilters = [DirectForm2Transposed<f32>; BAND_COUNT];

/// Equalizer working on normalized float samples
pub type ThreeBandEqF32 = ThreeBandEq<f32>;

/// Equalizer working on 16-bit signed PCM
pub type ThreeBandEqI16 = ThreeBandEq<i16>;

/// The three-band equalizer
///
/// The sample format `S` is fixed for the lifetime of the instance.
///
/// # Real-time Safety
///
/// `process` and `process_in_place` perform NO allocations, NO locks and
/// NO logging. Filter history is sized in [`ThreeBandEq::new`] and
/// [`ThreeBandEq::configure_channels`].
///
/// # Threading
///
/// Not internally synchronized. A gain change made on a control thread only
/// becomes visible to an audio thread through whatever synchronization the
/// caller uses to hand over `&mut` access.
pub struct ThreeBandEq<S: Sample> {
    // DirectForm2Transposed: better numerical stability than DF1
    // Outer index is the channel, inner index is the band
    filters: Vec<ChannelFilters>,
    coefficients: CoefficientSet,
    gains_db: [f32; BAND_COUNT],
    sample_rate: u32,
    enabled: bool,
    _format: PhantomData<fn() -> S>,
}

impl<S: Sample> std::fmt::Debug for ThreeBandEq<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreeBandEq")
            .field("format", &S::FORMAT)
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.filters.len())
            .field("gains_db", &self.gains_db)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl<S: Sample> ThreeBandEq<S> {
    /// Create a flat, enabled, stereo equalizer
    pub fn new(sample_rate: u32) -> Result<Self, DspError> {
        validate_sample_rate(sample_rate)?;

        let gains_db = [0.0; BAND_COUNT];
        let coefficients = CoefficientSet::derive(sample_rate, gains_db)?;

        Ok(Self {
            filters: (0..DEFAULT_CHANNELS)
                .map(|_| new_channel(&coefficients))
                .collect(),
            coefficients,
            gains_db,
            sample_rate,
            enabled: true,
            _format: PhantomData,
        })
    }

    /// Set the gain of one band, clamped to [`MIN_GAIN_DB`]..=[`MAX_GAIN_DB`]
    ///
    /// Returns the gain actually applied. Filter history is kept so a live
    /// change does not click. NaN is rejected and changes nothing.
    pub fn set_gain(&mut self, band: Band, gain_db: f32) -> Result<f32, DspError> {
        let gain_db = clamp_gain(gain_db)?;
        let section = band.coefficients(self.sample_rate, gain_db)?;
        self.apply_section(band, gain_db, section);
        Ok(gain_db)
    }

    pub fn set_low_gain(&mut self, gain_db: f32) -> Result<f32, DspError> {
        self.set_gain(Band::Low, gain_db)
    }

    pub fn set_mid_gain(&mut self, gain_db: f32) -> Result<f32, DspError> {
        self.set_gain(Band::Mid, gain_db)
    }

    pub fn set_high_gain(&mut self, gain_db: f32) -> Result<f32, DspError> {
        self.set_gain(Band::High, gain_db)
    }

    /// Set all three gains at once
    ///
    /// Either every gain is applied or, if any of them is NaN, none is.
    pub fn set_gains(
        &mut self,
        gains_db: [f32; BAND_COUNT],
    ) -> Result<[f32; BAND_COUNT], DspError> {
        let mut clamped = [0.0; BAND_COUNT];
        for (out, gain) in clamped.iter_mut().zip(gains_db) {
            *out = clamp_gain(gain)?;
        }
        let coefficients = CoefficientSet::derive(self.sample_rate, clamped)?;
        for band in Band::ALL {
            self.apply_section(band, clamped[band.index()], *coefficients.band(band));
        }
        Ok(clamped)
    }

    /// Load the gains of a built-in preset
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<[f32; BAND_COUNT], DspError> {
        self.set_gains(preset.1)
    }

    fn apply_section(&mut self, band: Band, gain_db: f32, section: SectionCoefficients) {
        self.coefficients.set_band(band, section);
        self.gains_db[band.index()] = gain_db;

        for channel in &mut self.filters {
            channel[band.index()].update_coefficients(section.into());
        }
    }

    /// Enable or bypass processing
    ///
    /// While bypassed, `process` copies input to output untouched and the
    /// filter history is frozen.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Reset filter state (clear delay lines)
    ///
    /// Call on discontinuities such as a seek, to prevent filter ringing.
    /// Gains and sample rate are kept.
    pub fn reset(&mut self) {
        for channel in &mut self.filters {
            for stage in channel.iter_mut() {
                stage.reset_state();
            }
        }
    }

    /// Change the sample rate, re-deriving every band and clearing history
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), DspError> {
        validate_sample_rate(sample_rate)?;
        let coefficients = CoefficientSet::derive(sample_rate, self.gains_db)?;

        self.sample_rate = sample_rate;
        self.coefficients = coefficients;
        self.rebuild_filters(self.filters.len());
        Ok(())
    }

    /// Reconfigure for `channels` channels (1 or 2)
    ///
    /// History indexed by the old layout is meaningless, so it is cleared.
    /// This allocates; call it from the control path, not the audio callback.
    pub fn configure_channels(&mut self, channels: usize) -> Result<(), DspError> {
        validate_channels(channels)?;
        self.rebuild_filters(channels);
        Ok(())
    }

    fn rebuild_filters(&mut self, channels: usize) {
        let coefficients = self.coefficients;
        self.filters.clear();
        self.filters
            .extend((0..channels).map(|_| new_channel(&coefficients)));
    }

    /// Process `sample_count` frames from `input` into `output`
    ///
    /// Buffers are interleaved (`[L0, R0, L1, R1, ...]` for stereo) and must
    /// each hold at least `sample_count * channel_count` samples; anything past
    /// that is left alone. All arguments are checked before any state changes.
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = sample_count * channel_count.
    pub fn process(
        &mut self,
        input: &[S],
        output: &mut [S],
        sample_count: usize,
        channel_count: usize,
    ) -> Result<(), DspError> {
        let len = self.check_request(sample_count, channel_count)?;
        check_len(len, input.len())?;
        check_len(len, output.len())?;

        let input = &input[..len];
        let output = &mut output[..len];

        if !self.enabled {
            output.copy_from_slice(input);
            return Ok(());
        }

        for (frame_in, frame_out) in input
            .chunks_exact(channel_count)
            .zip(output.chunks_exact_mut(channel_count))
        {
            for ((filters, x), y) in self.filters.iter_mut().zip(frame_in).zip(frame_out) {
                *y = S::from_f32(run_cascade(filters, x.to_f32()));
            }
        }

        Ok(())
    }

    /// Same as [`ThreeBandEq::process`], with input and output sharing `buffer`
    pub fn process_in_place(
        &mut self,
        buffer: &mut [S],
        sample_count: usize,
        channel_count: usize,
    ) -> Result<(), DspError> {
        let len = self.check_request(sample_count, channel_count)?;
        check_len(len, buffer.len())?;

        if !self.enabled {
            return Ok(());
        }

        for frame in buffer[..len].chunks_exact_mut(channel_count) {
            for (filters, sample) in self.filters.iter_mut().zip(frame.iter_mut()) {
                *sample = S::from_f32(run_cascade(filters, sample.to_f32()));
            }
        }

        Ok(())
    }

    /// Validate the frame/channel arguments, returning the sample span
    fn check_request(&self, sample_count: usize, channel_count: usize) -> Result<usize, DspError> {
        if sample_count == 0 {
            return Err(DspError::InvalidSampleCount(sample_count));
        }
        validate_channels(channel_count)?;
        if channel_count != self.filters.len() {
            return Err(DspError::ChannelMismatch {
                expected: self.filters.len(),
                got: channel_count,
            });
        }
        sample_count
            .checked_mul(channel_count)
            .ok_or(DspError::InvalidSampleCount(sample_count))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.filters.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn gain(&self, band: Band) -> f32 {
        self.gains_db[band.index()]
    }

    pub fn low_gain(&self) -> f32 {
        self.gain(Band::Low)
    }

    pub fn mid_gain(&self) -> f32 {
        self.gain(Band::Mid)
    }

    pub fn high_gain(&self) -> f32 {
        self.gain(Band::High)
    }

    /// Gains in band order (low, mid, high)
    pub fn gains(&self) -> [f32; BAND_COUNT] {
        self.gains_db
    }

    /// Currently cached coefficients (read-only)
    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }
}

/// Run one sample through low → mid → high
///
/// The order is part of the contract: cascaded sections round differently
/// when reordered.
#[inline]
fn run_cascade(filters: &mut ChannelFilters, input: f32) -> f32 {
    filters.iter_mut().fold(input, |x, stage| stage.run(x))
}

fn new_channel(coefficients: &CoefficientSet) -> ChannelFilters {
    core::array::from_fn(|i| {
        let section = *coefficients.band(Band::ALL[i]);
        DirectForm2Transposed::<f32>::new(section.into())
    })
}

fn validate_sample_rate(sample_rate: u32) -> Result<(), DspError> {
    if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        Ok(())
    } else {
        Err(DspError::InvalidSampleRate(sample_rate))
    }
}

fn validate_channels(channels: usize) -> Result<(), DspError> {
    if (1..=MAX_CHANNELS).contains(&channels) {
        Ok(())
    } else {
        Err(DspError::InvalidChannelCount(channels))
    }
}

fn check_len(required: usize, actual: usize) -> Result<(), DspError> {
    if actual < required {
        Err(DspError::BufferTooSmall { required, actual })
    } else {
        Ok(())
    }
}

fn clamp_gain(gain_db: f32) -> Result<f32, DspError> {
    if gain_db.is_nan() {
        return Err(DspError::InvalidGain(gain_db));
    }
    Ok(gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB))
}
