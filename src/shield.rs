//! Encryption/decryption using PBKDF2-HMAC-SHA256 + AES-256-GCM
//!
//! Each encryption draws a fresh salt and nonce, derives a one-off key
//! from the password, seals the UTF-8 plaintext with no associated data,
//! and armors `salt || nonce || ciphertext+tag` as a base64 token.
//! Decryption reverses this. Every decryption failure, whatever its cause,
//! reports the same message so callers cannot be used as an oracle.

use crate::armor;
use crate::config::ShieldConfig;
use crate::entropy::{EntropySource, OsEntropy};
use crate::envelope::{Envelope, NONCE_LEN};
use crate::error::{
    DECRYPTION_FAILED, ENCRYPTION_FAILED, ErrorCategory, ErrorKind, FailureClass, Result,
    ShieldError,
};
use crate::kdf::{self, SALT_LEN};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

/// Password-based text encryptor and decryptor
///
/// Holds configuration and an entropy source, nothing per call, so one
/// instance can be shared between threads.
pub struct Shield {
    config: ShieldConfig,
    entropy: Box<dyn EntropySource>,
}

impl Default for Shield {
    fn default() -> Self {
        Self::new(ShieldConfig::default())
    }
}

impl std::fmt::Debug for Shield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shield")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Shield {
    /// Uses the operating system's random source.
    pub fn new(config: ShieldConfig) -> Self {
        Self::with_entropy(config, OsEntropy)
    }

    pub fn with_entropy(config: ShieldConfig, entropy: impl EntropySource + 'static) -> Self {
        Self {
            config,
            entropy: Box::new(entropy),
        }
    }

    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Encrypt text with a password, returning a base64 token
    ///
    /// The core imposes no minimum length on either argument; callers
    /// decide what to accept.
    pub fn encrypt(&self, plaintext: &str, password: &str) -> Result<String> {
        let envelope = self.seal(plaintext.as_bytes(), password)?;
        Ok(armor::wrap(&envelope.to_bytes()))
    }

    /// Decrypt a token produced by [`Shield::encrypt`] under the same
    /// password and iteration count
    pub fn decrypt(&self, token: &str, password: &str) -> Result<String> {
        let bytes = armor::unwrap(token)?;
        let envelope = Envelope::parse(&bytes)?;
        let plaintext = self.open(&envelope, password)?;

        String::from_utf8(plaintext).map_err(|e| {
            tracing::debug!(
                valid_up_to = e.utf8_error().valid_up_to(),
                "authenticated payload is not UTF-8"
            );
            ShieldError::decryption(ErrorCategory::User, ErrorKind::InvalidUtf8)
        })
    }

    fn seal(&self, plaintext: &[u8], password: &str) -> Result<Envelope> {
        let mut salt = [0u8; SALT_LEN];
        self.entropy.fill(&mut salt).map_err(encryption_failed)?;

        let mut nonce = [0u8; NONCE_LEN];
        self.entropy.fill(&mut nonce).map_err(encryption_failed)?;

        let key = kdf::derive_key(password, &salt, self.config.iterations)
            .map_err(encryption_failed)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]));

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| ShieldError::encryption(ErrorCategory::Internal, ErrorKind::CipherFailure))?;

        Ok(Envelope {
            salt,
            nonce,
            sealed,
        })
    }

    fn open(&self, envelope: &Envelope, password: &str) -> Result<Vec<u8>> {
        let key = kdf::derive_key(password, &envelope.salt, self.config.iterations)
            .map_err(decryption_failed)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]));

        cipher
            .decrypt(Nonce::from_slice(&envelope.nonce), envelope.sealed.as_slice())
            .map_err(|_| {
                tracing::debug!(
                    sealed_len = envelope.sealed.len(),
                    "authentication failed"
                );
                ShieldError::decryption(ErrorCategory::User, ErrorKind::AuthenticationFailed)
            })
    }
}

fn encryption_failed(err: ShieldError) -> ShieldError {
    err.with_context(ENCRYPTION_FAILED)
        .in_class(FailureClass::Encryption)
}

fn decryption_failed(err: ShieldError) -> ShieldError {
    err.with_context(DECRYPTION_FAILED)
        .in_class(FailureClass::Decryption)
}

/// Encrypt with the default configuration and the OS random source
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    Shield::default().encrypt(plaintext, password)
}

/// Decrypt with the default configuration
pub fn decrypt(token: &str, password: &str) -> Result<String> {
    Shield::default().decrypt(token, password)
}
