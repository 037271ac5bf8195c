//! DSP Error Types

use thiserror::Error;

/// Errors that can occur during DSP operations
///
/// Every variant is raised before any filter state is touched, so a rejected
/// call leaves the equalizer exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Sample rate must be between 8000 and 192000 Hz, got {0}")]
    InvalidSampleRate(u32),

    #[error("Channel count must be 1 or 2, got {0}")]
    InvalidChannelCount(usize),

    #[error("Channel count {got} does not match the configured {expected} channels")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("Sample count must be positive and addressable, got {0}")]
    InvalidSampleCount(usize),

    #[error("Buffer too small: need {required} samples, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Cannot design a {frequency} Hz band at a sample rate of {sample_rate} Hz")]
    InvalidCoefficients { frequency: f32, sample_rate: u32 },

    #[error("Gain must be a number, got {0}")]
    InvalidGain(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DspError::InvalidSampleRate(4000);
        assert!(err.to_string().contains("4000"));

        let err = DspError::BufferTooSmall {
            required: 2048,
            actual: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));

        let err = DspError::ChannelMismatch {
            expected: 2,
            got: 1,
        };
        assert!(err.to_string().contains("configured 2"));
    }
}
