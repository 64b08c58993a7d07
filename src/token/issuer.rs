//! Token Issuer
//!
//! Issues HS256 tokens for a configured API key. The key name goes into the
//! header as `kid`; `iat` and `exp` come from the issuer's clock and TTL.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::{generate, Claims, TokenError};
use crate::clock::ClockSource;
use crate::config::{ApiKey, AuthConfig, ConfigError};

/// Claim carrying the client identity a token is bound to.
pub const CLIENT_ID_CLAIM: &str = "clientId";

/// Issues signed tokens with a fixed lifetime.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    api_key: ApiKey,
    ttl: Duration,
    clock: ClockSource,
}

impl TokenIssuer {
    /// Create an issuer.
    pub fn new(api_key: ApiKey, ttl: Duration, clock: ClockSource) -> Self {
        Self {
            api_key,
            ttl,
            clock,
        }
    }

    /// Create an issuer from config, using the system clock.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.require_api_key()?.clone(),
            config.token_ttl,
            ClockSource::System,
        ))
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The header every issued token carries.
    pub fn header(&self) -> Claims {
        let mut header = Claims::new();
        header.insert("alg".into(), json!("HS256"));
        header.insert("typ".into(), json!("JWT"));
        header.insert("kid".into(), json!(self.api_key.name));
        header
    }

    /// Issue a token carrying `claims`. `iat` and `exp` are always set by the
    /// issuer and replace any caller-provided values.
    pub fn issue(&self, claims: Claims) -> Result<String, TokenError> {
        let now = self.clock.epoch_seconds();
        let exp = now.saturating_add(self.ttl.as_secs());

        let mut payload = claims;
        payload.insert("iat".into(), json!(now));
        payload.insert("exp".into(), json!(exp));

        debug!(kid = %self.api_key.name, exp, "issuing token");
        generate(&self.header(), &payload, self.api_key.secret_bytes())
    }

    /// Issue a token bound to `client_id`. `None` issues an anonymous token.
    pub fn issue_for_client(
        &self,
        client_id: Option<&str>,
        claims: Claims,
    ) -> Result<String, TokenError> {
        let mut claims = claims;
        if let Some(client_id) = client_id {
            claims.insert(CLIENT_ID_CLAIM.into(), Value::String(client_id.to_string()));
        }
        self.issue(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{is_valid, parse, verify};

    const NOW: u64 = 1_700_000_000;

    fn issuer(clock: ClockSource) -> TokenIssuer {
        let key = ApiKey::parse("app.key:issuer-secret").unwrap();
        TokenIssuer::new(key, Duration::from_secs(600), clock)
    }

    #[test]
    fn test_issued_token_shape() {
        let token = issuer(ClockSource::new_mock(NOW)).issue(Claims::new()).unwrap();
        let parsed = parse(&token).unwrap();

        assert_eq!(parsed.header["alg"], "HS256");
        assert_eq!(parsed.header["typ"], "JWT");
        assert_eq!(parsed.header["kid"], "app.key");
        assert_eq!(parsed.payload["iat"], NOW);
        assert_eq!(parsed.payload["exp"], NOW + 600);
    }

    #[test]
    fn test_issuer_overrides_timing_claims() {
        let mut claims = Claims::new();
        claims.insert("exp".into(), json!(u64::MAX));
        claims.insert("scope".into(), json!("chat"));

        let token = issuer(ClockSource::new_mock(NOW)).issue(claims).unwrap();
        let parsed = parse(&token).unwrap();

        assert_eq!(parsed.payload["exp"], NOW + 600);
        assert_eq!(parsed.payload["scope"], "chat");
    }

    #[test]
    fn test_issued_token_validates_until_ttl() {
        let clock = ClockSource::new_mock(NOW);
        let token = issuer(clock.clone()).issue(Claims::new()).unwrap();
        let key = b"issuer-secret";

        assert!(is_valid(&token, || NOW + 599, key).unwrap());
        assert!(!is_valid(&token, || NOW + 600, key).unwrap());
    }

    #[test]
    fn test_issue_for_client() {
        let issuer = issuer(ClockSource::new_mock(NOW));

        let token = issuer.issue_for_client(Some("user-1"), Claims::new()).unwrap();
        let parsed = verify(&token, || NOW, b"issuer-secret").unwrap();
        assert_eq!(parsed.payload[CLIENT_ID_CLAIM], "user-1");

        let token = issuer.issue_for_client(None, Claims::new()).unwrap();
        let parsed = parse(&token).unwrap();
        assert!(!parsed.payload.contains_key(CLIENT_ID_CLAIM));
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            api_key: Some(ApiKey::parse("a:b").unwrap()),
            token_ttl: Duration::from_secs(30),
        };
        let issuer = TokenIssuer::from_config(&config).unwrap();
        assert_eq!(issuer.ttl(), Duration::from_secs(30));

        assert!(matches!(
            TokenIssuer::from_config(&AuthConfig::default()),
            Err(ConfigError::MissingVar(_))
        ));
    }
}
