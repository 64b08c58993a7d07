//! Signed Tokens
//!
//! Compact three-part tokens: `base64url(header).base64url(payload).base64url(mac)`
//! where `mac` is HMAC-SHA256 over the first two encoded parts joined by `.`.
//! Tokens carrying `"alg": "HS256"` in their header are ordinary HS256 JWTs.

pub mod codec;
pub mod issuer;
pub mod validator;

use serde_json::{Map, Value};
use thiserror::Error;

pub use codec::{generate, parse, sign};
pub use issuer::TokenIssuer;
pub use validator::{is_valid, verify, TokenValidator};

/// A JSON object used as token header or payload.
pub type Claims = Map<String, Value>;

/// Header and payload of a token, decoded but not verified.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToken {
    /// Decoded header object.
    pub header: Claims,
    /// Decoded payload object.
    pub payload: Claims,
}

/// Token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token does not have exactly three dot-separated parts.
    #[error("malformed token: expected 3 parts, found {parts}")]
    Malformed {
        /// Number of parts found.
        parts: usize,
    },
    /// A token part is not valid base64.
    #[error("token part is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A token part is not a JSON object.
    #[error("token part is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
    /// Required claim is missing.
    #[error("missing required claim: {0}")]
    MissingClaim(&'static str),
    /// Claim has the wrong type.
    #[error("invalid claim: {0}")]
    InvalidClaim(&'static str),
    /// The signing key was rejected by the MAC.
    #[error("invalid signing key")]
    InvalidKey,
    /// Signature does not match header and payload.
    #[error("invalid signature")]
    InvalidSignature,
    /// Token has expired.
    #[error("token expired")]
    Expired,
}

/// Split a token into its three encoded parts.
pub(crate) fn split_parts(token: &str) -> Result<[&str; 3], TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        &[header, payload, signature] => Ok([header, payload, signature]),
        _ => Err(TokenError::Malformed { parts: parts.len() }),
    }
}
