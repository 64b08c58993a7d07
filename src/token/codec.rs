//! Token Codec
//!
//! Builds and parses signed tokens. Parsing never checks the signature or
//! expiry; use [`crate::token::validator`] for that.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{split_parts, Claims, ParsedToken, TokenError};
use crate::encoding::{base64url_decode, base64url_encode};

type HmacSha256 = Hmac<Sha256>;

/// Compute the encoded HMAC-SHA256 signature of `signing_input`
/// (`"<encodedHeader>.<encodedPayload>"`).
pub fn sign(signing_input: &str, key: &[u8]) -> Result<String, TokenError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| TokenError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    Ok(base64url_encode(mac.finalize().into_bytes()))
}

/// Build a signed token from a header and payload.
///
/// Contents are not validated; any JSON object is accepted.
pub fn generate(header: &Claims, payload: &Claims, key: &[u8]) -> Result<String, TokenError> {
    let encoded_header = base64url_encode(serde_json::to_vec(header)?);
    let encoded_payload = base64url_encode(serde_json::to_vec(payload)?);

    let signing_input = format!("{encoded_header}.{encoded_payload}");
    let signature = sign(&signing_input, key)?;

    Ok(format!("{signing_input}.{signature}"))
}

/// Decode the header and payload of a token without verifying it.
pub fn parse(token: &str) -> Result<ParsedToken, TokenError> {
    let [header, payload, _] = split_parts(token)?;

    Ok(ParsedToken {
        header: decode_part(header)?,
        payload: decode_part(payload)?,
    })
}

/// Decode one base64url JSON-object part.
pub(crate) fn decode_part(part: &str) -> Result<Claims, TokenError> {
    let bytes = base64url_decode(part)?;
    Ok(serde_json::from_slice(&bytes)?)
}
