//! Bearer-token payload decoding.
//!
//! A token is an opaque `header.payload.signature` string; the only part the
//! client reads is the `id` claim inside the base64-encoded JSON payload,
//! which keys the user-record lookup during rehydration.

use crate::error::TokenDecodeError;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

/// Identity claim recovered from a token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
}

/// Decode the payload segment and pull out the identity claim.
///
/// Never panics; every malformed input maps to a [`TokenDecodeError`] the
/// caller handles by clearing the derived tenant state.
pub fn decode_identity(token: &str) -> Result<Identity, TokenDecodeError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenDecodeError::MalformedToken),
    };

    let bytes = decode_segment(payload)?;
    let value: Value = serde_json::from_slice(&bytes)?;

    match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(Identity { id: id.clone() }),
        // Some backends issue numeric user ids.
        Some(Value::Number(id)) => Ok(Identity { id: id.to_string() }),
        _ => Err(TokenDecodeError::MissingClaim),
    }
}

/// Payloads in the wild use both the JWT-standard URL-safe alphabet and the
/// standard one (padded); accept either.
fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| STANDARD.decode(segment))
}
