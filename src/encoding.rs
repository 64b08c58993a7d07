//! Base64 Helpers
//!
//! Token parts travel as unpadded base64url; socket identifiers arrive as
//! standard base64. Decoders accept input with or without `=` padding.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};

/// Never pads on encode, accepts either form on decode.
const INDIFFERENT_PAD: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// URL-safe alphabet (`-`, `_`), unpadded output.
pub const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, INDIFFERENT_PAD);

/// Standard alphabet (`+`, `/`), padding optional on decode.
pub const STANDARD_LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, INDIFFERENT_PAD);

/// Encode bytes as base64url without trailing `=`.
pub fn base64url_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(bytes)
}

/// Decode a base64url string. Falls back to the standard alphabet so tokens
/// produced by encoders that skipped the `+/` -> `-_` translation still parse.
pub fn base64url_decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE
        .decode(encoded)
        .or_else(|_| STANDARD_LENIENT.decode(encoded))
}

/// Decode standard base64, padded or not.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD_LENIENT.decode(encoded)
}

/// Encode bytes as padded standard base64.
pub fn base64_encode(bytes: impl AsRef<[u8]>) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
