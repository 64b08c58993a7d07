//! Authentication Configuration
//!
//! Key material and token lifetime, usually read from the environment.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the `name:secret` API key.
pub const ENV_API_KEY: &str = "BROADCAST_API_KEY";
/// Environment variable holding the token lifetime in seconds.
pub const ENV_TOKEN_TTL: &str = "BROADCAST_TOKEN_TTL_SECS";
/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is not set.
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    /// API key is not of the form `name:secret`.
    #[error("API key must have the form 'name:secret'")]
    InvalidApiKey,
    /// TTL is not a positive number of seconds.
    #[error("invalid token TTL: {0:?}")]
    InvalidTtl(String),
}

/// An API key split into its public name and signing secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Public key name, sent as the token `kid`.
    pub name: String,
    /// HMAC secret.
    pub secret: String,
}

impl ApiKey {
    /// Parse `name:secret`. The secret may itself contain `:`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let (name, secret) = raw.trim().split_once(':').ok_or(ConfigError::InvalidApiKey)?;
        if name.is_empty() || secret.is_empty() {
            return Err(ConfigError::InvalidApiKey);
        }
        Ok(Self {
            name: name.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Secret as key bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Token signing configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Signing key. If None, tokens cannot be issued or validated.
    pub api_key: Option<ApiKey>,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

impl AuthConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).as_deref().map(ApiKey::parse).transpose()?;

        let token_ttl = match lookup(ENV_TOKEN_TTL) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTtl(raw)),
            },
            None => DEFAULT_TOKEN_TTL,
        };

        Ok(Self { api_key, token_ttl })
    }

    /// Check if a signing key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// The configured key, or an error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&ApiKey, ConfigError> {
        self.api_key.as_ref().ok_or(ConfigError::MissingVar(ENV_API_KEY))
    }
}
