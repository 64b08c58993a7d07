//! Broadcast Auth
//!
//! Issues a token for the configured API key, then parses and validates it
//! and decodes a sample socket id. Useful for checking a deployment's key.

use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use broadcast_auth::{
    config::AuthConfig,
    socket_id::{self, SocketIdentifier},
    token::{self, Claims, TokenIssuer, TokenValidator},
    ApiKey, ClockSource, VERSION,
};

/// Key used when `BROADCAST_API_KEY` is not set.
const DEMO_API_KEY: &str = "demo.key:demo-secret";

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Broadcast Auth v{}", VERSION);

    let mut config = AuthConfig::from_env().context("invalid configuration")?;
    if !config.is_configured() {
        warn!("BROADCAST_API_KEY not set, using demo key");
        config.api_key = Some(ApiKey::parse(DEMO_API_KEY)?);
    }
    let api_key = config.require_api_key()?.clone();
    info!("Key: {} (ttl {}s)", api_key.name, config.token_ttl.as_secs());

    demo_token(&config, &api_key)?;
    demo_socket_id()?;

    Ok(())
}

/// Issue, parse and validate a token.
fn demo_token(config: &AuthConfig, api_key: &ApiKey) -> anyhow::Result<()> {
    info!("=== Token ===");

    let issuer = TokenIssuer::from_config(config)?;
    let mut claims = Claims::new();
    claims.insert("capability".into(), json!({"private:*": ["subscribe", "publish"]}));

    let token = issuer.issue_for_client(Some("demo-user"), claims)?;
    info!("Issued token ({} bytes)", token.len());

    let parsed = token::parse(&token)?;
    info!("Header: {}", serde_json::Value::Object(parsed.header));
    info!("Payload: {}", serde_json::Value::Object(parsed.payload));

    let validator = TokenValidator::new(api_key.secret_bytes(), ClockSource::System);
    info!("Valid now: {}", validator.is_valid(&token)?);

    let expiry = ClockSource::System.epoch_seconds() + config.token_ttl.as_secs();
    let at_expiry = token::is_valid(&token, || expiry, api_key.secret_bytes())?;
    info!("Valid at expiry: {}", at_expiry);

    let wrong_key = token::is_valid(
        &token,
        || ClockSource::System.epoch_seconds(),
        b"not-the-secret",
    )?;
    info!("Valid with wrong key: {}", wrong_key);

    Ok(())
}

/// Round-trip a socket id and show the error for a malformed one.
fn demo_socket_id() -> anyhow::Result<()> {
    info!("=== Socket Id ===");

    let id = socket_id::encode(&SocketIdentifier::new("conn-abc123", Some("demo-user".into())));
    info!("Encoded: {}", id);

    match socket_id::decode(Some(id.as_str()))? {
        Some(decoded) => info!(
            "Decoded: connection={} client={:?}",
            decoded.connection_key, decoded.client_id
        ),
        None => info!("No socket id"),
    }

    if let Err(err) = socket_id::decode(Some("bm90LWpzb24=")) {
        info!("Malformed id rejected: {}", err);
    }

    Ok(())
}
