//! Error types shared across the crate.

use thiserror::Error;

/// Transport-level failure talking to the backend.
///
/// Session operations never leak this type to their callers; they map every
/// variant to a uniform connection-error outcome. The typed [`crate::api`]
/// surface returns it directly so embedders that call endpoints themselves
/// can tell the cases apart.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (DNS, TLS, timeout, connection reset).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered, but the body was not the expected JSON envelope.
    #[error("unparseable response body (status {status}): {body}")]
    InvalidBody { status: u16, body: String },
}

/// Failure decoding the payload segment of a bearer token.
///
/// Rehydration maps any of these to "tenant unknown" and carries on; the
/// token itself stays valid for authentication.
#[derive(Debug, Error)]
pub enum TokenDecodeError {
    /// The token is not a three-segment `header.payload.signature` string.
    #[error("token does not have exactly three segments")]
    MalformedToken,

    /// The payload segment is not valid base64.
    #[error("payload segment is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not a JSON object.
    #[error("payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    /// The payload decoded cleanly but carries no usable `id` claim.
    #[error("payload carries no identity claim")]
    MissingClaim,
}
