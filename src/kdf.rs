//! Password-based key derivation (PBKDF2-HMAC-SHA256)

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};
use pbkdf2::hmac::Hmac;
use sha2::Sha256;
use std::time::Instant;
use zeroize::Zeroizing;

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Derive a 32-byte key from a password and salt using PBKDF2-HMAC-SHA256
///
/// The password is used as its UTF-8 bytes. The key is zeroized on drop.
pub fn derive_key(
    password: &str,
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if iterations == 0 {
        return Err(ShieldError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidConfig,
            "iteration count must be at least 1",
        ));
    }

    let started = Instant::now();
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, iterations, &mut key[..]).map_err(
        |e| {
            ShieldError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::KdfFailure,
                format!("PBKDF2 key derivation failed: {}", e),
            )
        },
    )?;
    tracing::debug!(
        iterations,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "derived key"
    );

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer() {
        let salt = [0x42u8; SALT_LEN];
        let key = derive_key("pass1234", &salt, 1000).unwrap();

        // Produced independently with Python's hashlib.pbkdf2_hmac.
        #[rustfmt::skip]
        let expected: [u8; KEY_LEN] = [
            0xe8, 0x7c, 0x72, 0x72, 0xc8, 0x87, 0xbb, 0xfc,
            0x7e, 0xa0, 0x42, 0x1f, 0x02, 0xfc, 0xf9, 0x6c,
            0x82, 0x3d, 0x6e, 0xe8, 0x4f, 0x0e, 0x0e, 0xac,
            0x76, 0x9a, 0x61, 0x1b, 0x73, 0x7a, 0x15, 0xe6,
        ];
        assert_eq!(*key, expected);
    }

    #[test]
    fn test_salt_changes_key() {
        let k1 = derive_key("pass1234", &[1u8; SALT_LEN], 10).unwrap();
        let k2 = derive_key("pass1234", &[2u8; SALT_LEN], 10).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_password_changes_key() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key("pass1234", &salt, 10).unwrap();
        let k2 = derive_key("pass1235", &salt, 10).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_iterations_change_key() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key("pass1234", &salt, 10).unwrap();
        let k2 = derive_key("pass1234", &salt, 11).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_zero_iterations() {
        let err = derive_key("pass1234", &[0u8; SALT_LEN], 0).expect_err("expected failure");
        assert_eq!(err.kind, Some(ErrorKind::InvalidConfig));
    }
}
