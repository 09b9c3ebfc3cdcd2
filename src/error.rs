use std::error::Error as StdError;

use thiserror::Error;

/// User-facing message shared by every decryption failure.
pub const DECRYPTION_FAILED: &str = "wrong password or corrupted data";

/// User-facing message shared by every encryption failure.
pub const ENCRYPTION_FAILED: &str = "encryption failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Use of Internal is never a guarantee the error is not, for example,
    /// due to a user error - merely that it cannot be confidently
    /// determined by the code.
    Internal,

    /// The user provided invalid input or performed an action that is
    /// unsupported or impossible to complete.
    User,
}

/// Coarse failure taxonomy reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Input was rejected before reaching the cryptographic core.
    Validation,
    /// The core could not produce a token.
    Encryption,
    /// The core could not recover plaintext from a token.
    Decryption,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Text, token or password was empty.
    EmptyInput,
    /// Password shorter than the configured minimum.
    PasswordTooShort,
    /// Configuration values the core cannot work with.
    InvalidConfig,
    /// The entropy source could not supply salt or nonce bytes.
    EntropyUnavailable,
    /// Low-level PBKDF2 key derivation failed.
    KdfFailure,
    /// AES-GCM failed to seal data.
    CipherFailure,
    /// Base64 decoding of the token failed.
    TokenDecode,
    /// Decoded token is shorter than salt plus nonce.
    TruncatedInput,
    /// Authentication failed due to an incorrect password or tampering
    /// or corruption.
    AuthenticationFailed,
    /// Authenticated payload was not valid UTF-8 text.
    InvalidUtf8,
    /// Password could not be obtained from the configured reader.
    PasswordUnavailable,
    /// A background job running the core panicked or was cancelled.
    TaskFailed,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct ShieldError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    class: Option<FailureClass>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl ShieldError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            class: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            class: kind.default_class(),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            class: kind.default_class(),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// A validation failure raised by the caller before invoking the core.
    pub fn validation(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorCategory::User, kind, msg).in_class(FailureClass::Validation)
    }

    /// An encryption failure. The display message is always [`ENCRYPTION_FAILED`].
    pub fn encryption(category: ErrorCategory, kind: ErrorKind) -> Self {
        Self::with_kind(category, kind, ENCRYPTION_FAILED).in_class(FailureClass::Encryption)
    }

    /// A decryption failure. The display message is always [`DECRYPTION_FAILED`]
    /// regardless of the underlying cause; only `kind` tells them apart.
    pub fn decryption(category: ErrorCategory, kind: ErrorKind) -> Self {
        Self::with_kind(category, kind, DECRYPTION_FAILED).in_class(FailureClass::Decryption)
    }

    /// Reassigns the failure class, keeping everything else.
    pub fn in_class(mut self, class: FailureClass) -> Self {
        self.class = Some(class);
        self
    }

    /// The failure class this error belongs to, if any.
    pub fn class(&self) -> Option<FailureClass> {
        self.class
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        let class = self.class;
        Self {
            category,
            kind,
            class,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

impl ErrorKind {
    fn default_class(self) -> Option<FailureClass> {
        match self {
            ErrorKind::EmptyInput | ErrorKind::PasswordTooShort => Some(FailureClass::Validation),
            ErrorKind::EntropyUnavailable | ErrorKind::CipherFailure => {
                Some(FailureClass::Encryption)
            }
            ErrorKind::TokenDecode
            | ErrorKind::TruncatedInput
            | ErrorKind::AuthenticationFailed
            | ErrorKind::InvalidUtf8 => Some(FailureClass::Decryption),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_errors_share_message() {
        let kinds = [
            ErrorKind::TokenDecode,
            ErrorKind::TruncatedInput,
            ErrorKind::AuthenticationFailed,
            ErrorKind::InvalidUtf8,
        ];
        for kind in kinds {
            let err = ShieldError::decryption(ErrorCategory::User, kind);
            assert_eq!(err.to_string(), DECRYPTION_FAILED);
            assert_eq!(err.class(), Some(FailureClass::Decryption));
            assert_eq!(err.kind, Some(kind));
        }
    }

    #[test]
    fn test_context_keeps_kind_and_class() {
        let err = ShieldError::decryption(ErrorCategory::User, ErrorKind::AuthenticationFailed)
            .with_context("failed to decrypt");
        assert_eq!(err.message(), "failed to decrypt");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
        assert_eq!(err.class(), Some(FailureClass::Decryption));
        assert_eq!(
            err.source_error().map(|e| e.to_string()),
            Some(DECRYPTION_FAILED.to_string())
        );
    }

    #[test]
    fn test_kdf_failure_class_follows_operation() {
        let enc = ShieldError::encryption(ErrorCategory::Internal, ErrorKind::KdfFailure);
        let dec = ShieldError::decryption(ErrorCategory::Internal, ErrorKind::KdfFailure);
        assert_eq!(enc.class(), Some(FailureClass::Encryption));
        assert_eq!(dec.class(), Some(FailureClass::Decryption));
    }
}
