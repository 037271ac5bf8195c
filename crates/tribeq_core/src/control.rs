//! Control Queue
//!
//! `ThreeBandEq` is not synchronized, so a UI thread cannot touch an
//! equalizer that an audio callback owns. Instead it sends [`EqCommand`]s
//! through a lock-free SPSC ring buffer, and the audio thread applies them
//! between buffers.
//!
//! Commands flow from control thread -> audio thread only. The ring buffer's
//! release/acquire handoff means the audio thread always sees a whole
//! command, so it never filters with half-updated coefficients.

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, warn};
use tribeq_dsp::{Band, DspError, Sample, ThreeBandEq, BAND_COUNT};

use crate::error::{EqError, EqResult};

/// Default queue depth; a UI rarely has more than a handful of changes per buffer
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Parameter change for an equalizer owned by another thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EqCommand {
    /// Set a single band's gain (dB, clamped on apply)
    SetGain { band: Band, gain_db: f32 },

    /// Set all gains at once (low, mid, high)
    SetGains([f32; BAND_COUNT]),

    /// Enable or bypass processing
    SetEnabled(bool),

    /// Clear filter history
    Reset,
}

impl EqCommand {
    fn validate(&self) -> Result<(), DspError> {
        let gains: &[f32] = match self {
            EqCommand::SetGain { gain_db, .. } => std::slice::from_ref(gain_db),
            EqCommand::SetGains(gains) => gains,
            EqCommand::SetEnabled(_) | EqCommand::Reset => &[],
        };
        match gains.iter().find(|g| g.is_nan()) {
            Some(&g) => Err(DspError::InvalidGain(g)),
            None => Ok(()),
        }
    }
}

/// Create a connected controller / receiver pair
pub fn channel(capacity: usize) -> (EqController, EqCommandReceiver) {
    let (producer, consumer) = RingBuffer::<EqCommand>::new(capacity.max(1));
    (EqController { producer }, EqCommandReceiver { consumer })
}

/// Sending half, lives on the control/UI thread
pub struct EqController {
    producer: Producer<EqCommand>,
}

impl EqController {
    /// Queue a command without blocking
    ///
    /// Commands carrying NaN are rejected here so that the audio thread only
    /// ever receives commands it can apply.
    pub fn send(&mut self, command: EqCommand) -> EqResult<()> {
        command.validate()?;

        self.producer.push(command).map_err(|_| {
            warn!("Control queue full, dropping {:?}", command);
            EqError::QueueFull
        })?;
        debug!("Queued {:?}", command);
        Ok(())
    }

    pub fn set_gain(&mut self, band: Band, gain_db: f32) -> EqResult<()> {
        self.send(EqCommand::SetGain { band, gain_db })
    }

    pub fn set_gains(&mut self, gains_db: [f32; BAND_COUNT]) -> EqResult<()> {
        self.send(EqCommand::SetGains(gains_db))
    }

    pub fn set_enabled(&mut self, enabled: bool) -> EqResult<()> {
        self.send(EqCommand::SetEnabled(enabled))
    }

    pub fn reset(&mut self) -> EqResult<()> {
        self.send(EqCommand::Reset)
    }

    /// Free slots left in the queue
    pub fn available(&self) -> usize {
        self.producer.slots()
    }

    /// True once the receiving half has been dropped
    pub fn is_disconnected(&self) -> bool {
        self.producer.is_abandoned()
    }
}

/// Receiving half, lives on the audio thread
pub struct EqCommandReceiver {
    consumer: Consumer<EqCommand>,
}

impl EqCommandReceiver {
    /// Apply every queued command to `eq`, returning how many were applied
    ///
    /// # Real-time Safety
    /// No allocations, no locks, no logging. Call between buffers.
    pub fn apply_pending<S: Sample>(&mut self, eq: &mut ThreeBandEq<S>) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.consumer.pop() {
            apply(eq, command);
            applied += 1;
        }
        applied
    }

    /// Commands waiting to be applied
    pub fn pending(&self) -> usize {
        self.consumer.slots()
    }
}

/// `send` only queues NaN-free gains, and `eq` was built at a supported
/// rate, so the setters below cannot fail
fn apply<S: Sample>(eq: &mut ThreeBandEq<S>, command: EqCommand) {
    match command {
        EqCommand::SetGain { band, gain_db } => {
            let _ = eq.set_gain(band, gain_db);
        }
        EqCommand::SetGains(gains) => {
            let _ = eq.set_gains(gains);
        }
        EqCommand::SetEnabled(enabled) => eq.set_enabled(enabled),
        EqCommand::Reset => eq.reset(),
    }
}
