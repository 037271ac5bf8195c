//! Equalizer Settings
//!
//! Serializable snapshot of everything a caller configures on an equalizer.
//! Hosts use it to ship a configuration across a bridge as JSON; nothing
//! here touches the filesystem.

use serde::{Deserialize, Serialize};
use tribeq_dsp::{Sample, ThreeBandEq, MAX_CHANNELS, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

use crate::error::{EqError, EqResult};

/// Equalizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqSettings {
    /// Sample rate in Hz (8000 - 192000)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: usize,

    /// Band gains in dB; out-of-range values are clamped when applied
    pub low_gain_db: f32,
    pub mid_gain_db: f32,
    pub high_gain_db: f32,

    /// `false` bypasses all processing
    pub enabled: bool,
}

impl Default for EqSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            low_gain_db: 0.0,
            mid_gain_db: 0.0,
            high_gain_db: 0.0,
            enabled: true,
        }
    }
}

impl EqSettings {
    /// Validate configuration
    pub fn validate(&self) -> EqResult<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(EqError::InvalidSettings(format!(
                "Invalid sample rate: {}",
                self.sample_rate
            )));
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(EqError::InvalidSettings(format!(
                "Invalid channel count: {}",
                self.channels
            )));
        }
        if self.gains().iter().any(|g| g.is_nan()) {
            return Err(EqError::InvalidSettings("Gain is not a number".to_string()));
        }
        Ok(())
    }

    /// Gains in band order (low, mid, high)
    pub fn gains(&self) -> [f32; 3] {
        [self.low_gain_db, self.mid_gain_db, self.high_gain_db]
    }

    /// Build an equalizer matching these settings
    pub fn build<S: Sample>(&self) -> EqResult<ThreeBandEq<S>> {
        self.validate()?;

        let mut eq = ThreeBandEq::new(self.sample_rate)?;
        eq.configure_channels(self.channels)?;
        eq.set_gains(self.gains())?;
        eq.set_enabled(self.enabled);
        Ok(eq)
    }

    /// Snapshot the configuration of a live equalizer
    pub fn capture<S: Sample>(eq: &ThreeBandEq<S>) -> Self {
        let [low_gain_db, mid_gain_db, high_gain_db] = eq.gains();
        Self {
            sample_rate: eq.sample_rate(),
            channels: eq.channels(),
            low_gain_db,
            mid_gain_db,
            high_gain_db,
            enabled: eq.is_enabled(),
        }
    }

    pub fn from_json(json: &str) -> EqResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> EqResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
