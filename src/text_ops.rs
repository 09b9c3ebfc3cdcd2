//! Text encryption/decryption operations
//!
//! This module connects text sources and sinks (inline arguments, files,
//! stdio) to the core, running caller-side validation first. It is what
//! the `textshield` binary drives.

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};
use crate::password::PasswordReader;
use crate::shield::Shield;
use crate::validate;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Where input text comes from
#[derive(Debug, Clone)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

/// Where output text goes
#[derive(Debug, Clone)]
pub enum TextSink {
    /// Written exactly, atomically, with mode 0o600 on Unix.
    File(PathBuf),
    /// Written followed by a newline.
    Stdout,
}

/// Encrypt text with a password
///
/// Reads text from `source` and checks it, then reads a password from
/// `password_reader` and checks it against the shield's configuration, and
/// writes the token to `sink`. Empty text is rejected before any prompt.
pub fn encrypt_text(
    source: &TextSource,
    sink: &TextSink,
    password_reader: &mut dyn PasswordReader,
    shield: &Shield,
) -> Result<()> {
    let text = read_text(source)?;
    let text = validate::validate_plaintext(&text)?;
    let password = password_reader.read_password()?;
    validate::validate_encrypt_password(&password, shield.config())?;

    let token = shield.encrypt(text, &password)?;
    write_text(sink, &token)?;
    tracing::info!(plaintext_len = text.len(), token_len = token.len(), "encrypted text");
    Ok(())
}

/// Decrypt a token with a password
///
/// Reads the token from `source`, then a password from `password_reader`,
/// and writes the recovered plaintext to `sink`.
pub fn decrypt_text(
    source: &TextSource,
    sink: &TextSink,
    password_reader: &mut dyn PasswordReader,
    shield: &Shield,
) -> Result<()> {
    let token = read_text(source)?;
    let token = validate::validate_token(&token)?;
    let password = password_reader.read_password()?;
    validate::validate_decrypt_password(&password)?;

    let plaintext = Zeroizing::new(shield.decrypt(token, &password)?);
    write_text(sink, &plaintext)?;
    tracing::info!(plaintext_len = plaintext.len(), "decrypted text");
    Ok(())
}

/// Read the whole of `source` as UTF-8 text
pub fn read_text(source: &TextSource) -> Result<Zeroizing<String>> {
    match source {
        TextSource::Inline(text) => Ok(Zeroizing::new(text.clone())),
        TextSource::File(path) => {
            let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
            into_text(bytes, &format!("{} is not valid UTF-8", path.display()))
        }
        TextSource::Stdin => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes).map_err(|e| {
                ShieldError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    format!("failed to read from stdin: {}", e),
                    e,
                )
            })?;
            into_text(bytes, "stdin is not valid UTF-8")
        }
    }
}

/// Write `text` to `sink`
pub fn write_text(sink: &TextSink, text: &str) -> Result<()> {
    match sink {
        TextSink::File(path) => write_file_atomic(path, text.as_bytes())
            .map_err(|e| e.with_context(format!("failed to write to {}", path.display()))),
        TextSink::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text)
                .and_then(|()| stdout.flush())
                .map_err(|e| {
                    ShieldError::with_kind_and_source(
                        ErrorCategory::Internal,
                        ErrorKind::Io,
                        format!("failed to write to stdout: {}", e),
                        e,
                    )
                })
        }
    }
}

fn into_text(bytes: Vec<u8>, msg: &str) -> Result<Zeroizing<String>> {
    String::from_utf8(bytes).map(Zeroizing::new).map_err(|e| {
        ShieldError::with_kind_and_source(ErrorCategory::User, ErrorKind::Io, msg, e)
    })
}

/// Write a file via tempfile + fsync + rename, with mode 0o600 on Unix
///
/// Either the previous file or the complete new one exists afterwards,
/// never a partial write.
fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        ShieldError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to create tempfile in {}", dir.display()),
            e,
        )
    })?;

    // NamedTempFile is created 0o600 on Unix already; make it explicit.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| io_error("failed to set tempfile permissions", e))?;
    }

    temp_file
        .write_all(contents)
        .map_err(|e| io_error("failed to write to tempfile", e))?;
    temp_file
        .flush()
        .map_err(|e| io_error("failed to flush tempfile", e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| io_error("failed to sync file prior to rename", e))?;

    temp_file.persist(path).map_err(|e| {
        ShieldError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

fn io_error(msg: &str, err: io::Error) -> ShieldError {
    ShieldError::with_kind_and_source(ErrorCategory::Internal, ErrorKind::Io, msg, err)
}

fn read_error(path: &Path, err: io::Error) -> ShieldError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    ShieldError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
