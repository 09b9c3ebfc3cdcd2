//! Async entry points
//!
//! Key derivation is deliberately slow, so these wrappers run the core on
//! tokio's blocking pool instead of an async worker thread. Dropping the
//! returned future abandons the result; the blocking job still finishes
//! and its output, including the derived key, is dropped with it.

use crate::error::{ErrorCategory, ErrorKind, FailureClass, Result, ShieldError};
use crate::shield::Shield;
use std::sync::Arc;
use tokio::task::JoinError;
use zeroize::Zeroizing;

/// Encrypt on the blocking pool
pub async fn encrypt_async(
    shield: Arc<Shield>,
    plaintext: impl Into<String>,
    password: impl Into<String>,
) -> Result<String> {
    let plaintext = Zeroizing::new(plaintext.into());
    let password = Zeroizing::new(password.into());

    tokio::task::spawn_blocking(move || shield.encrypt(&plaintext, &password))
        .await
        .map_err(|e| join_failed(e, FailureClass::Encryption))?
}

/// Decrypt on the blocking pool
pub async fn decrypt_async(
    shield: Arc<Shield>,
    token: impl Into<String>,
    password: impl Into<String>,
) -> Result<String> {
    let token = token.into();
    let password = Zeroizing::new(password.into());

    tokio::task::spawn_blocking(move || shield.decrypt(&token, &password))
        .await
        .map_err(|e| join_failed(e, FailureClass::Decryption))?
}

fn join_failed(err: JoinError, class: FailureClass) -> ShieldError {
    let msg = if err.is_cancelled() {
        "background job was cancelled"
    } else {
        "background job panicked"
    };
    ShieldError::with_kind_and_source(ErrorCategory::Internal, ErrorKind::TaskFailed, msg, err)
        .in_class(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShieldConfig;
    use crate::error::DECRYPTION_FAILED;

    fn shared() -> Arc<Shield> {
        Arc::new(Shield::new(ShieldConfig::default().with_iterations(10)))
    }

    #[tokio::test]
    async fn test_async_roundtrip() {
        let shield = shared();
        let token = encrypt_async(shield.clone(), "Hello, World!", "pass1234")
            .await
            .unwrap();
        let plaintext = decrypt_async(shield, token, "pass1234").await.unwrap();
        assert_eq!(plaintext, "Hello, World!");
    }

    #[tokio::test]
    async fn test_async_wrong_password() {
        let shield = shared();
        let token = encrypt_async(shield.clone(), "secret", "pass1234")
            .await
            .unwrap();
        let err = decrypt_async(shield, token, "wrong123")
            .await
            .expect_err("expected failure");
        assert_eq!(err.class(), Some(FailureClass::Decryption));
        assert_eq!(err.to_string(), DECRYPTION_FAILED);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_calls_are_independent() {
        let shield = shared();
        let mut handles = Vec::new();
        for i in 0..8 {
            let shield = shield.clone();
            handles.push(tokio::spawn(async move {
                let text = format!("message {}", i);
                let password = format!("password-{}", i);
                let token = encrypt_async(shield.clone(), text.clone(), password.clone())
                    .await
                    .unwrap();
                let back = decrypt_async(shield, token.clone(), password).await.unwrap();
                assert_eq!(back, text);
                token
            }));
        }

        let mut tokens = Vec::new();
        for handle in handles {
            tokens.push(handle.await.unwrap());
        }
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), 8);
    }
}
