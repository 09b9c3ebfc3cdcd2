//! textshield - password-based text encryption
//!
//! Text is sealed with AES-256-GCM under a key derived from a password
//! with PBKDF2-HMAC-SHA256, and handed back as a base64 token that carries
//! its own salt and nonce:
//!
//! ```text
//! base64( salt(16) || nonce(12) || ciphertext || tag(16) )
//! ```
//!
//! ```no_run
//! let token = textshield::encrypt("Hello, World!", "pass1234")?;
//! assert_eq!(textshield::decrypt(&token, "pass1234")?, "Hello, World!");
//! # Ok::<(), textshield::ShieldError>(())
//! ```

#![forbid(unsafe_code)]

pub mod armor;
pub mod config;
pub mod entropy;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod notice;
pub mod password;
pub mod shield;
pub mod task;
pub mod text_ops;
pub mod validate;

pub use config::ShieldConfig;
pub use error::{ErrorCategory, ErrorKind, FailureClass, ShieldError};
pub use shield::{Shield, decrypt, encrypt};
