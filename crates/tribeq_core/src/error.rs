//! Host Error Types

use thiserror::Error;

use crate::host::EqHandle;

/// Errors reported across the host call surface
#[derive(Error, Debug)]
pub enum EqError {
    /// Bad sample rate, channel count, sample count, buffer size or gain
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] tribeq_dsp::DspError),

    #[error("Equalizer used before activation")]
    NotInitialized,

    #[error("License key rejected: {0}")]
    InvalidLicenseKey(&'static str),

    /// The handle was valid once but has been destroyed
    #[error("Equalizer {0} used after destroy")]
    UseAfterFree(EqHandle),

    #[error("Equalizer {0} was never created by this host")]
    InvalidHandle(EqHandle),

    #[error("Control queue full - audio thread is not draining commands")]
    QueueFull,

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EqError {
    /// Whether this error is the argument-validation family
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EqError::InvalidArgument(_))
    }
}

/// Result type alias for host operations
pub type EqResult<T> = Result<T, EqError>;
