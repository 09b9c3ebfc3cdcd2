//! User-facing notifications
//!
//! Frontends report every outcome as a short `(text, severity)` notice.
//! The texts for core outcomes are fixed here so that every frontend says
//! the same thing, in particular for decryption failures.

use crate::error::{ErrorCategory, ErrorKind, FailureClass, Result, ShieldError};
use std::error::Error as StdError;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn encrypted() -> Self {
        Self::new("Text encrypted successfully!", Severity::Success)
    }

    pub fn decrypted() -> Self {
        Self::new("Text decrypted successfully!", Severity::Success)
    }

    /// Notice for a failed operation
    ///
    /// Validation errors keep their specific message. Core failures are
    /// collapsed to one fixed text per operation. Anything else (I/O,
    /// password prompts) is shown with its full cause chain.
    pub fn from_error(err: &ShieldError) -> Self {
        let text = match err.class() {
            Some(FailureClass::Validation) => err.message().to_string(),
            Some(FailureClass::Encryption) => "Encryption failed. Please try again.".to_string(),
            Some(FailureClass::Decryption) => {
                "Decryption failed. Wrong password or corrupted data.".to_string()
            }
            None => error_chain(err),
        };
        Self::new(text, Severity::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        write!(f, "{}: {}", label, self.text)
    }
}

/// Something that can show notices to a user
pub trait Notifier {
    fn notify(&mut self, notice: &Notice) -> Result<()>;
}

/// Writes one notice per line to any `io::Write` (stderr for the CLI)
pub struct WriterNotifier<W: Write> {
    out: W,
}

impl<W: Write> WriterNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for WriterNotifier<W> {
    fn notify(&mut self, notice: &Notice) -> Result<()> {
        writeln!(self.out, "{}", notice).map_err(|e| {
            ShieldError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write notice: {}", e),
                e,
            )
        })
    }
}

fn error_chain(err: &ShieldError) -> String {
    let mut text = err.message().to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // Messages built with format!("...: {}", e) already embed their cause
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use std::io;

    #[test]
    fn test_validation_message_kept() {
        let err = ShieldError::validation(ErrorKind::EmptyInput, "Please enter a password");
        let notice = Notice::from_error(&err);
        assert_eq!(notice.text, "Please enter a password");
        assert_eq!(notice.severity, Severity::Error);
    }

    #[test]
    fn test_decryption_causes_collapse() {
        for kind in [
            ErrorKind::TokenDecode,
            ErrorKind::TruncatedInput,
            ErrorKind::AuthenticationFailed,
        ] {
            let err = ShieldError::decryption(ErrorCategory::User, kind);
            assert_eq!(
                Notice::from_error(&err).text,
                "Decryption failed. Wrong password or corrupted data."
            );
        }
    }

    #[test]
    fn test_encryption_failure() {
        let err = ShieldError::encryption(ErrorCategory::Internal, ErrorKind::CipherFailure);
        assert_eq!(
            Notice::from_error(&err).text,
            "Encryption failed. Please try again."
        );
    }

    #[test]
    fn test_io_error_chain() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = ShieldError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            "failed to read from missing.txt",
            io_err,
        )
        .with_context("could not load input");
        assert_eq!(
            Notice::from_error(&err).text,
            "could not load input: failed to read from missing.txt: no such file"
        );
    }

    #[test]
    fn test_writer_notifier() {
        let mut notifier = WriterNotifier::new(Vec::new());
        notifier.notify(&Notice::encrypted()).unwrap();
        notifier
            .notify(&Notice::new("Nothing to copy", Severity::Info))
            .unwrap();
        let written = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(
            written,
            "ok: Text encrypted successfully!\ninfo: Nothing to copy\n"
        );
    }
}
