//! Sources of salt and nonce bytes
//!
//! The core never reaches for ambient randomness; it asks the
//! [`EntropySource`] it was built with. Production code uses [`OsEntropy`].
//! Tests that need to pin the exact envelope layout use
//! [`ScriptedEntropy`].

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};
use rand::RngCore;
use rand::rngs::OsRng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Trait for supplying random bytes to the encryptor
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely or fail. Partial fills must not be reported as success.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            ShieldError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::EntropyUnavailable,
                format!("operating system random source failed: {}", e),
                e,
            )
        })
    }
}

/// Hands out a fixed byte script in order (for testing)
///
/// Each call to [`EntropySource::fill`] consumes the next `dest.len()`
/// bytes. Running out of script is an error, never a silent zero fill.
///
/// This type is ONLY for testing. Reusing a script across encryptions
/// reuses salt and nonce.
pub struct ScriptedEntropy {
    script: Mutex<VecDeque<u8>>,
}

impl ScriptedEntropy {
    pub fn new(script: impl Into<Vec<u8>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script.into())),
        }
    }

    /// Script that yields `salt` for the first fill and `nonce` for the second.
    pub fn salt_then_nonce(salt: &[u8], nonce: &[u8]) -> Self {
        let mut script = Vec::with_capacity(salt.len() + nonce.len());
        script.extend_from_slice(salt);
        script.extend_from_slice(nonce);
        Self::new(script)
    }

    /// Number of bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if script.len() < dest.len() {
            return Err(ShieldError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::EntropyUnavailable,
                format!(
                    "entropy script exhausted: wanted {} bytes, {} left",
                    dest.len(),
                    script.len()
                ),
            ));
        }
        let wanted = dest.len();
        for (slot, byte) in dest.iter_mut().zip(script.drain(..wanted)) {
            *slot = byte;
        }
        Ok(())
    }
}
