//! Input checks performed by callers before invoking the core
//!
//! The core accepts any text and any password. Frontends run these checks
//! first so users get a specific message instead of a token protected by
//! an empty password. Text is checked on its own so a frontend can reject
//! empty input before prompting for a password.

use crate::config::ShieldConfig;
use crate::error::{ErrorKind, Result, ShieldError};

/// Check text to be encrypted, returning it trimmed
pub fn validate_plaintext(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ShieldError::validation(
            ErrorKind::EmptyInput,
            "Please enter some text to encrypt",
        ));
    }
    Ok(text)
}

/// Check a password chosen for encryption
///
/// The minimum length is counted in Unicode scalar values (`char`s), not
/// bytes and not UTF-16 code units. A password of two emoji is therefore
/// two characters long here, although a browser's `String.length` reports
/// four.
pub fn validate_encrypt_password(password: &str, config: &ShieldConfig) -> Result<()> {
    if password.is_empty() {
        return Err(ShieldError::validation(
            ErrorKind::EmptyInput,
            "Please enter a password",
        ));
    }
    if password.chars().count() < config.min_password_len {
        return Err(ShieldError::validation(
            ErrorKind::PasswordTooShort,
            format!(
                "Please use a longer password (at least {} characters)",
                config.min_password_len
            ),
        ));
    }
    Ok(())
}

/// Check an encryption request, returning the text to encrypt
///
/// Surrounding whitespace is trimmed from the text, never from the password.
/// The password length floor is counted in Unicode scalar values; see
/// [`validate_encrypt_password`].
pub fn validate_encrypt_request<'a>(
    text: &'a str,
    password: &str,
    config: &ShieldConfig,
) -> Result<&'a str> {
    let text = validate_plaintext(text)?;
    validate_encrypt_password(password, config)?;
    Ok(text)
}

/// Check a token to be decrypted, returning it trimmed
pub fn validate_token(token: &str) -> Result<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ShieldError::validation(
            ErrorKind::EmptyInput,
            "Please enter encrypted text",
        ));
    }
    Ok(token)
}

/// Check a password given for decryption
///
/// No length policy applies here: a token must stay decryptable even if
/// the policy was raised after it was made.
pub fn validate_decrypt_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(ShieldError::validation(
            ErrorKind::EmptyInput,
            "Please enter the password",
        ));
    }
    Ok(())
}

/// Check a decryption request, returning the token to decrypt
pub fn validate_decrypt_request<'a>(token: &'a str, password: &str) -> Result<&'a str> {
    let token = validate_token(token)?;
    validate_decrypt_password(password)?;
    Ok(token)
}
