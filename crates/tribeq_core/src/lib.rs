//! tribeq Core - Host Call Surface
//!
//! This crate wraps the `tribeq_dsp` engine in the shape a native bridge
//! (JNI, C ABI, ...) consumes:
//! - Explicit activation token instead of a hidden "license initialized" flag
//! - Handle table with use-after-destroy detection
//! - Serializable settings with validation
//! - Lock-free command queue from a control thread to the audio thread
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Bridge / UI Thread                       │
//! │  Activation ──▶ EqHost::create ──▶ EqHandle ──▶ set_*_gain   │
//! │                                   EqController::send         │
//! └──────────────────────────────────────────────────────────────┘
//!                              │ rtrb (SPSC)
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Audio Thread                          │
//! │   EqCommandReceiver::apply_pending ──▶ ThreeBandEq::process  │
//! │              (Zero allocation in this path)                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod activation;
mod control;
mod error;
mod host;
mod settings;

pub use activation::Activation;
pub use control::{channel, EqCommand, EqCommandReceiver, EqController, DEFAULT_QUEUE_CAPACITY};
pub use error::{EqError, EqResult};
pub use host::{EqHandle, EqHost};
pub use settings::EqSettings;

// Re-export DSP types for convenience
pub use tribeq_dsp::{
    find_preset, Band, DspError, Preset, Sample, SampleFormat, ThreeBandEq, ThreeBandEqF32,
    ThreeBandEqI16, PRESETS,
};
