//! License Activation
//!
//! The engine is gated behind a license key. Instead of a process-wide
//! "initialized" flag that silently turns calls into no-ops, activation
//! yields an [`Activation`] value, and only a host holding one can create
//! equalizers.

use tracing::{info, warn};

use crate::error::{EqError, EqResult};

/// Longest key accepted, in bytes
const MAX_KEY_LEN: usize = 512;

/// Proof that a license key was accepted
///
/// Cloneable so several hosts can share one activation. The key itself is
/// never printed.
#[derive(Clone)]
pub struct Activation {
    key: String,
}

impl Activation {
    /// Validate `key` and produce an activation token
    ///
    /// Surrounding whitespace is ignored. The key must be non-empty,
    /// printable ASCII without inner whitespace.
    pub fn initialize(key: &str) -> EqResult<Self> {
        let key = key.trim();

        let problem = if key.is_empty() {
            Some("key is empty")
        } else if key.len() > MAX_KEY_LEN {
            Some("key is too long")
        } else if !key.bytes().all(|b| b.is_ascii_graphic()) {
            Some("key contains non-printable or whitespace characters")
        } else {
            None
        };

        if let Some(reason) = problem {
            warn!("License activation failed: {}", reason);
            return Err(EqError::InvalidLicenseKey(reason));
        }

        info!("License activated ({} character key)", key.len());
        Ok(Self {
            key: key.to_string(),
        })
    }

    /// Last four characters of the key, for support diagnostics
    pub fn key_suffix(&self) -> &str {
        let start = self.key.len().saturating_sub(4);
        &self.key[start..]
    }
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation")
            .field("key", &format_args!("…{}", self.key_suffix()))
            .finish()
    }
}
