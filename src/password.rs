//! Password reading functionality

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};
use std::io::{self, Read, Write};
use zeroize::Zeroizing;

/// Trait for reading passwords from various sources
pub trait PasswordReader {
    /// Read a password as UTF-8 text
    ///
    /// Returns the password wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn read_password(&mut self) -> Result<Zeroizing<String>>;
}

/// Returns a fixed password (for testing)
pub struct ConstantPasswordReader {
    password: Zeroizing<String>,
}

impl ConstantPasswordReader {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
        }
    }
}

impl PasswordReader for ConstantPasswordReader {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        Ok(self.password.clone())
    }
}

/// Reads a password from any io::Read source
///
/// The whole stream is the password, minus a single trailing line ending
/// so that `echo secret | textshield ...` means "secret".
pub struct ReaderPasswordReader {
    reader: Box<dyn Read>,
}

impl ReaderPasswordReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PasswordReader for ReaderPasswordReader {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            ShieldError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading password: {}", e),
                e,
            )
        })?;

        let mut password = Zeroizing::new(
            String::from_utf8(std::mem::take(&mut *data)).map_err(|e| {
                // Keep the rejected bytes zeroized too
                drop(Zeroizing::new(e.into_bytes()));
                ShieldError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::PasswordUnavailable,
                    "password is not valid UTF-8",
                )
            })?,
        );
        strip_line_ending(&mut password);
        Ok(password)
    }
}

/// Reads password from the controlling terminal with no echo
///
/// The terminal is opened directly, so stdin stays free for piped text.
/// Without a controlling terminal the read fails.
pub struct TerminalPasswordReader;

impl TerminalPasswordReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPasswordReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordReader for TerminalPasswordReader {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        io::stderr()
            .write_all(b"Password (textshield): ")
            .and_then(|()| io::stderr().flush())
            .map_err(|e| {
                ShieldError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    format!("failed to write prompt: {}", e),
                    e,
                )
            })?;

        // Read from the controlling terminal, not stdin, *without echo*
        let password = rpassword::read_password().map_err(|e| {
            ShieldError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::PasswordUnavailable,
                "cannot read password from terminal (use --password-stdin or --password-file)",
                e,
            )
        })?;

        Ok(Zeroizing::new(password))
    }
}

fn strip_line_ending(password: &mut String) {
    if password.ends_with('\n') {
        password.pop();
        if password.ends_with('\r') {
            password.pop();
        }
    }
}
