//! Tunable parameters for the encryption core and its callers

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};

/// PBKDF2 iteration count used when nothing else is configured.
///
/// Tokens produced by the browser version of textshield use this value.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Minimum password length, in characters, enforced by callers.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 4;

/// Parameters shared by encryption and decryption.
///
/// The iteration count is not recorded in tokens, so a token only decrypts
/// under the same `iterations` value that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShieldConfig {
    /// PBKDF2-HMAC-SHA256 work factor.
    pub iterations: u32,
    /// Caller-side password length floor. The core itself ignores this.
    pub min_password_len: usize,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }
}

impl ShieldConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_min_password_len(mut self, min_password_len: usize) -> Self {
        self.min_password_len = min_password_len;
        self
    }

    /// Checks that the core can operate with these values.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ShieldError::with_kind(
                ErrorCategory::User,
                ErrorKind::InvalidConfig,
                "iteration count must be at least 1",
            ));
        }
        Ok(())
    }
}
