//! Sample Formats
//!
//! The equalizer filters in `f32`. Callers hand it either 16-bit signed PCM
//! or normalized float; this module converts between the two with a single
//! full-scale factor so that decode followed by encode is exact. Decoded
//! values always lie in -1.0..=1.0, so no input can overflow the filters.

/// Full-scale magnitude used for 16-bit conversion (both directions)
pub const I16_FULL_SCALE: f32 = 32768.0;

/// External sample representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// 16-bit signed integer PCM
    I16,
    /// 32-bit float, normalized to -1.0..=1.0
    F32,
}

/// A sample type the equalizer can read and write
///
/// Both directions range-limit: `to_f32` yields a finite value in
/// -1.0..=1.0, and `from_f32` clamps to the format's extremes, never wrapping.
pub trait Sample: Copy + PartialEq + Send + Sync + 'static {
    const FORMAT: SampleFormat;

    fn to_f32(self) -> f32;

    fn from_f32(value: f32) -> Self;
}

impl Sample for i16 {
    const FORMAT: SampleFormat = SampleFormat::I16;

    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self) / I16_FULL_SCALE
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        // Float-to-int `as` saturates and maps NaN to 0, but clamp first so
        // the rounding step never sees a huge value.
        (value * I16_FULL_SCALE).clamp(-32768.0, 32767.0).round() as i16
    }
}

impl Sample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;

    #[inline]
    fn to_f32(self) -> f32 {
        // NaN/Inf, or a finite value big enough to overflow b1 * x, would
        // poison the filter history for good
        if self.is_finite() {
            self.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        }
    }
}
