//! Token Validator
//!
//! Checks a token's `exp` claim against an injected clock and its signature
//! against the caller's key.

use subtle::ConstantTimeEq;
use tracing::debug;

use super::codec::{decode_part, sign};
use super::{split_parts, ParsedToken, TokenError};
use crate::clock::ClockSource;

/// Outcome of checking a well-formed token.
struct Verdict {
    signature_valid: bool,
    expired: bool,
}

/// Read `exp` and compare signatures. Errors only for malformed input.
fn check<'a, F>(
    token: &'a str,
    now_fn: F,
    key: &[u8],
) -> Result<(Verdict, [&'a str; 3]), TokenError>
where
    F: FnOnce() -> u64,
{
    let parts = split_parts(token)?;
    let [header, payload, signature] = parts;

    let claims = decode_part(payload)?;
    let exp = claims.get("exp").ok_or(TokenError::MissingClaim("exp"))?;
    let exp = exp
        .as_i64()
        .map(i128::from)
        .or_else(|| exp.as_u64().map(i128::from))
        .ok_or(TokenError::InvalidClaim("exp"))?;

    let now = now_fn();
    // exactly at expiry counts as expired
    let expired = exp <= i128::from(now);

    let expected = sign(&format!("{header}.{payload}"), key)?;
    let signature_valid = bool::from(expected.as_bytes().ct_eq(signature.as_bytes()));

    if !signature_valid {
        debug!("token signature mismatch");
    } else if expired {
        debug!(exp = %exp, now, "token expired");
    }

    Ok((Verdict { signature_valid, expired }, parts))
}

/// Returns `Ok(true)` only if the signature matches and `exp > now_fn()`.
///
/// A missing or non-integer `exp`, a token without exactly three parts, or an
/// undecodable payload are caller errors and returned as `Err`.
pub fn is_valid<F>(token: &str, now_fn: F, key: &[u8]) -> Result<bool, TokenError>
where
    F: FnOnce() -> u64,
{
    let (verdict, _) = check(token, now_fn, key)?;
    Ok(verdict.signature_valid && !verdict.expired)
}

/// Validate a token and return its decoded parts.
///
/// Unlike [`is_valid`], a bad signature or an expired token is reported as
/// [`TokenError::InvalidSignature`] or [`TokenError::Expired`].
pub fn verify<F>(token: &str, now_fn: F, key: &[u8]) -> Result<ParsedToken, TokenError>
where
    F: FnOnce() -> u64,
{
    let (verdict, [header, payload, _]) = check(token, now_fn, key)?;

    if !verdict.signature_valid {
        return Err(TokenError::InvalidSignature);
    }
    if verdict.expired {
        return Err(TokenError::Expired);
    }

    Ok(ParsedToken {
        header: decode_part(header)?,
        payload: decode_part(payload)?,
    })
}

/// Validator bound to a key and a clock.
#[derive(Clone)]
pub struct TokenValidator {
    key: Vec<u8>,
    clock: ClockSource,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("key", &"<redacted>")
            .field("clock", &self.clock)
            .finish()
    }
}

impl TokenValidator {
    /// Create a validator for tokens signed with `key`.
    pub fn new(key: impl Into<Vec<u8>>, clock: ClockSource) -> Self {
        Self {
            key: key.into(),
            clock,
        }
    }

    /// See [`is_valid`].
    pub fn is_valid(&self, token: &str) -> Result<bool, TokenError> {
        is_valid(token, || self.clock.epoch_seconds(), &self.key)
    }

    /// See [`verify`].
    pub fn verify(&self, token: &str) -> Result<ParsedToken, TokenError> {
        verify(token, || self.clock.epoch_seconds(), &self.key)
    }
}

// =============================================================================
// TESTS
// =============================================================================
