//! # Broadcast Auth
//!
//! Token and connection-identity helpers for broadcasting integrations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BROADCAST AUTH                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  token/          - Signed tokens (HMAC-SHA256)               │
//! │  ├── codec.rs    - generate / parse                          │
//! │  ├── validator.rs- expiry + signature checks                 │
//! │  └── issuer.rs   - HS256 tokens for an API key               │
//! │                                                              │
//! │  socket_id.rs    - base64 JSON connection identifiers        │
//! │  encoding.rs     - base64url / base64 helpers                │
//! │  clock.rs        - Injectable epoch-second time sources      │
//! │  config.rs       - API key and TTL from the environment      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use broadcast_auth::token::{generate, is_valid, Claims};
//! use serde_json::json;
//!
//! let mut header = Claims::new();
//! header.insert("alg".into(), json!("HS256"));
//! let mut payload = Claims::new();
//! payload.insert("exp".into(), json!(1_000));
//!
//! let token = generate(&header, &payload, b"secret").unwrap();
//! assert!(is_valid(&token, || 999, b"secret").unwrap());
//! assert!(!is_valid(&token, || 1_000, b"secret").unwrap());
//! ```
//!
//! Every operation is a pure function of its arguments; the clock is always
//! injected.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod encoding;
pub mod socket_id;
pub mod token;

// Re-export commonly used types
pub use clock::ClockSource;
pub use config::{ApiKey, AuthConfig, ConfigError};
pub use encoding::base64url_encode;
pub use socket_id::{SocketIdError, SocketIdFault, SocketIdentifier, SOCKET_ID_HINT};
pub use token::{Claims, ParsedToken, TokenError, TokenIssuer, TokenValidator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
