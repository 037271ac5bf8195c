//! Equalizer Host
//!
//! Owns equalizer instances on behalf of a bridge layer that can only pass
//! integers across its boundary. Instances are addressed by [`EqHandle`];
//! handles are never reused, so a destroyed handle is reported as
//! [`EqError::UseAfterFree`] instead of reaching another instance.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use tribeq_dsp::{Band, Sample, ThreeBandEq, BAND_COUNT};

use crate::activation::Activation;
use crate::error::{EqError, EqResult};
use crate::settings::EqSettings;

/// Opaque identifier of an equalizer owned by an [`EqHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EqHandle(u64);

impl EqHandle {
    /// Rebuild a handle from the integer a bridge stored
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn into_raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EqHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle table of equalizers sharing one sample format
///
/// Like the equalizers themselves, a host is not internally synchronized;
/// callers needing shared access wrap it in their own lock.
pub struct EqHost<S: Sample> {
    activation: Option<Activation>,
    instances: HashMap<EqHandle, ThreeBandEq<S>>,
    /// Next handle to issue; 0 is never issued
    next_id: u64,
}

impl<S: Sample> EqHost<S> {
    /// Create a host that can build equalizers
    pub fn new(activation: Activation) -> Self {
        Self {
            activation: Some(activation),
            instances: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create a host without a license; `create` fails with `NotInitialized`
    pub fn unlicensed() -> Self {
        Self {
            activation: None,
            instances: HashMap::new(),
            next_id: 1,
        }
    }

    /// Attach an activation obtained after the host was built
    pub fn activate(&mut self, activation: Activation) {
        self.activation = Some(activation);
    }

    pub fn is_activated(&self) -> bool {
        self.activation.is_some()
    }

    fn require_activation(&self) -> EqResult<()> {
        if self.activation.is_none() {
            warn!("Equalizer requested before license activation");
            return Err(EqError::NotInitialized);
        }
        Ok(())
    }

    /// Create a flat, enabled, stereo equalizer
    pub fn create(&mut self, sample_rate: u32) -> EqResult<EqHandle> {
        self.require_activation()?;
        let eq = ThreeBandEq::new(sample_rate).map_err(|e| {
            warn!("Rejected equalizer creation: {}", e);
            e
        })?;
        Ok(self.insert(eq))
    }

    /// Create an equalizer configured from `settings`
    pub fn create_with_settings(&mut self, settings: &EqSettings) -> EqResult<EqHandle> {
        self.require_activation()?;
        let eq = settings.build()?;
        Ok(self.insert(eq))
    }

    fn insert(&mut self, eq: ThreeBandEq<S>) -> EqHandle {
        let handle = EqHandle(self.next_id);
        self.next_id += 1;
        info!(
            "Created equalizer {} ({:?}, {} Hz)",
            handle,
            S::FORMAT,
            eq.sample_rate()
        );
        self.instances.insert(handle, eq);
        handle
    }

    /// Release an equalizer and all of its state
    pub fn destroy(&mut self, handle: EqHandle) -> EqResult<()> {
        match self.instances.remove(&handle) {
            Some(_) => {
                info!("Destroyed equalizer {}", handle);
                Ok(())
            }
            None => {
                let err = self.stale(handle);
                warn!("Destroy failed: {}", err);
                Err(err)
            }
        }
    }

    fn stale(&self, handle: EqHandle) -> EqError {
        stale_handle(handle, self.next_id)
    }

    /// Borrow an equalizer (for UI state sync)
    pub fn get(&self, handle: EqHandle) -> EqResult<&ThreeBandEq<S>> {
        self.instances
            .get(&handle)
            .ok_or_else(|| self.stale(handle))
    }

    /// Borrow an equalizer mutably
    pub fn get_mut(&mut self, handle: EqHandle) -> EqResult<&mut ThreeBandEq<S>> {
        let next_id = self.next_id;
        self.instances
            .get_mut(&handle)
            .ok_or_else(|| stale_handle(handle, next_id))
    }

    /// Control-path lookup that logs rejected handles
    fn control(&mut self, handle: EqHandle, action: &str) -> EqResult<&mut ThreeBandEq<S>> {
        self.get_mut(handle).map_err(|e| {
            warn!("{} rejected: {}", action, e);
            e
        })
    }

    /// Set one band's gain; returns the gain applied after clamping
    pub fn set_gain(&mut self, handle: EqHandle, band: Band, gain_db: f32) -> EqResult<f32> {
        let eq = self.control(handle, "Set gain")?;
        let applied = eq.set_gain(band, gain_db).map_err(|e| {
            warn!("Set gain rejected for {}: {}", handle, e);
            e
        })?;

        if applied != gain_db {
            warn!(
                "Equalizer {} {:?} gain {} dB clamped to {} dB",
                handle, band, gain_db, applied
            );
        } else {
            debug!("Equalizer {} {:?} gain set to {} dB", handle, band, applied);
        }
        Ok(applied)
    }

    pub fn set_low_gain(&mut self, handle: EqHandle, gain_db: f32) -> EqResult<f32> {
        self.set_gain(handle, Band::Low, gain_db)
    }

    pub fn set_mid_gain(&mut self, handle: EqHandle, gain_db: f32) -> EqResult<f32> {
        self.set_gain(handle, Band::Mid, gain_db)
    }

    pub fn set_high_gain(&mut self, handle: EqHandle, gain_db: f32) -> EqResult<f32> {
        self.set_gain(handle, Band::High, gain_db)
    }

    /// Set all gains at once (all or nothing)
    pub fn set_gains(
        &mut self,
        handle: EqHandle,
        gains_db: [f32; BAND_COUNT],
    ) -> EqResult<[f32; BAND_COUNT]> {
        let eq = self.control(handle, "Set gains")?;
        let applied = eq.set_gains(gains_db)?;
        debug!("Equalizer {} gains set to {:?}", handle, applied);
        Ok(applied)
    }

    pub fn set_enabled(&mut self, handle: EqHandle, enabled: bool) -> EqResult<()> {
        self.control(handle, "Set enabled")?.set_enabled(enabled);
        debug!("Equalizer {} enabled = {}", handle, enabled);
        Ok(())
    }

    /// Clear filter history, e.g. after a seek
    pub fn reset(&mut self, handle: EqHandle) -> EqResult<()> {
        self.control(handle, "Reset")?.reset();
        debug!("Equalizer {} history cleared", handle);
        Ok(())
    }

    pub fn configure_channels(&mut self, handle: EqHandle, channels: usize) -> EqResult<()> {
        self.control(handle, "Configure channels")?
            .configure_channels(channels)?;
        info!("Equalizer {} reconfigured for {} channel(s)", handle, channels);
        Ok(())
    }

    pub fn set_sample_rate(&mut self, handle: EqHandle, sample_rate: u32) -> EqResult<()> {
        self.control(handle, "Set sample rate")?
            .set_sample_rate(sample_rate)?;
        info!("Equalizer {} sample rate set to {} Hz", handle, sample_rate);
        Ok(())
    }

    /// Process `sample_count` frames of interleaved audio
    ///
    /// Audio path: no logging, no allocation.
    pub fn process(
        &mut self,
        handle: EqHandle,
        input: &[S],
        output: &mut [S],
        sample_count: usize,
        channel_count: usize,
    ) -> EqResult<()> {
        self.get_mut(handle)?
            .process(input, output, sample_count, channel_count)?;
        Ok(())
    }

    /// In-place variant of [`EqHost::process`]
    pub fn process_in_place(
        &mut self,
        handle: EqHandle,
        buffer: &mut [S],
        sample_count: usize,
        channel_count: usize,
    ) -> EqResult<()> {
        self.get_mut(handle)?
            .process_in_place(buffer, sample_count, channel_count)?;
        Ok(())
    }

    /// Equalize a mono buffer with a throwaway instance
    ///
    /// Mirrors the one-shot bridge call (`buffer, low, mid, high, rate`).
    /// Allocates and starts from silent history every time, so it is meant
    /// for offline buffers, not for consecutive chunks of a stream.
    pub fn apply_once(
        &self,
        buffer: &mut [S],
        gains_db: [f32; BAND_COUNT],
        sample_rate: u32,
    ) -> EqResult<()> {
        self.require_activation()?;

        let mut eq = ThreeBandEq::<S>::new(sample_rate)?;
        eq.configure_channels(1)?;
        let applied = eq.set_gains(gains_db)?;
        if applied != gains_db {
            warn!("One-shot EQ gains {:?} dB clamped to {:?} dB", gains_db, applied);
        }

        let frames = buffer.len();
        eq.process_in_place(buffer, frames, 1)?;
        debug!("Applied one-shot EQ {:?} to {} samples", gains_db, frames);
        Ok(())
    }

    /// Number of live equalizers
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Error for a handle that has no live instance
fn stale_handle(handle: EqHandle, next_id: u64) -> EqError {
    if handle.0 != 0 && handle.0 < next_id {
        EqError::UseAfterFree(handle)
    } else {
        EqError::InvalidHandle(handle)
    }
}
