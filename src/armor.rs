//! Text armoring for envelopes
//!
//! Tokens are standard-alphabet base64 with padding, matching what
//! browsers produce with `btoa`. On the way in, ASCII whitespace anywhere
//! in the token is ignored and padding is optional, so tokens that were
//! line-wrapped or trimmed by a mail client still decode.

use crate::error::{ErrorCategory, ErrorKind, Result, ShieldError};
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Wrap bytes in armor, returning the token
pub fn wrap(body: &[u8]) -> String {
    STANDARD.encode(body)
}

/// Unwrap a token, returning the original bytes
pub fn unwrap(token: &str) -> Result<Vec<u8>> {
    let compact: String = token
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    LENIENT.decode(compact.as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "token is not valid base64");
        ShieldError::decryption(ErrorCategory::User, ErrorKind::TokenDecode)
    })
}
