//! Binary envelope layout
//!
//! The binary format is:
//! - salt: 16 bytes
//! - nonce: 12 bytes
//! - sealed payload: variable length (AES-GCM ciphertext followed by a
//!   16-byte authentication tag)
//!
//! There is no length field and no version marker; the sealed payload runs
//! to the end of the input.

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};
use crate::kdf::SALT_LEN;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the AES-GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Smallest input that can be split into salt and nonce
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the authentication tag appended
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Serialize as salt(16) + nonce(12) + sealed(variable)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(MIN_ENVELOPE_LEN + self.sealed.len());
        output.extend_from_slice(&self.salt);
        output.extend_from_slice(&self.nonce);
        output.extend_from_slice(&self.sealed);
        output
    }

    /// Split raw bytes into salt, nonce and sealed payload
    ///
    /// Only the structural floor is checked here. Whether the payload is
    /// long enough to hold a tag is left to the cipher, so that every
    /// undersized payload fails the same way a forged one does.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            tracing::debug!(
                len = bytes.len(),
                min = MIN_ENVELOPE_LEN,
                "envelope shorter than salt and nonce"
            );
            return Err(ShieldError::decryption(
                ErrorCategory::User,
                ErrorKind::TruncatedInput,
            ));
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);

        let mut envelope = Envelope {
            salt: [0u8; SALT_LEN],
            nonce: [0u8; NONCE_LEN],
            sealed: sealed.to_vec(),
        };
        envelope.salt.copy_from_slice(salt);
        envelope.nonce.copy_from_slice(nonce);
        Ok(envelope)
    }
}
