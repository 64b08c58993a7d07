//! Socket Identifiers
//!
//! A socket id is standard base64 over a JSON object:
//!
//! ```text
//! {"connectionKey": "<live connection>", "clientId": "<identity>" | null}
//! ```
//!
//! Broadcasters use it to exclude the sending connection from an event, and to
//! check that a connection belongs to the identified client. `clientId` must
//! be present but is `null` for anonymous connections.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::encoding::{base64_decode, base64_encode};

/// Hint appended to every socket id error.
pub const SOCKET_ID_HINT: &str = "please make sure to send base64 encoded json with \
    'connectionKey' and 'clientId' as keys. 'clientId' is null if connection is not identified";

/// A decoded socket identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketIdentifier {
    /// Key of the live connection.
    pub connection_key: String,
    /// Client identity, or None for an anonymous connection.
    pub client_id: Option<String>,
}

impl SocketIdentifier {
    /// Create a socket identifier.
    pub fn new(connection_key: impl Into<String>, client_id: Option<String>) -> Self {
        Self {
            connection_key: connection_key.into(),
            client_id,
        }
    }

    /// Whether the connection carries a client identity.
    pub fn is_identified(&self) -> bool {
        self.client_id.is_some()
    }
}

/// Wire shape before presence checks. `client_id` is `Some(None)` for an
/// explicit `null` and `None` when the key is absent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSocketId {
    #[serde(default)]
    connection_key: Option<String>,
    #[serde(default, deserialize_with = "present")]
    client_id: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// What was wrong with a socket id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketIdFault {
    /// Not base64, or not a JSON object of the expected shape.
    Decoding,
    /// `connectionKey` is absent.
    MissingConnectionKey,
    /// `clientId` is absent.
    MissingClientId,
}

impl SocketIdFault {
    fn describe(self) -> &'static str {
        match self {
            SocketIdFault::Decoding => "SocketId decoding failed",
            SocketIdFault::MissingConnectionKey => "ConnectionKey is missing",
            SocketIdFault::MissingClientId => "ClientId is missing",
        }
    }
}

/// Malformed socket id.
#[derive(Debug, Error)]
#[error("{}, {}", .fault.describe(), SOCKET_ID_HINT)]
pub struct SocketIdError {
    /// What went wrong.
    pub fault: SocketIdFault,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SocketIdError {
    fn new(fault: SocketIdFault) -> Self {
        Self {
            fault,
            source: None,
        }
    }

    fn decoding<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            fault: SocketIdFault::Decoding,
            source: Some(Box::new(err)),
        }
    }
}

/// Decode a socket id.
///
/// `None` or an empty string means "no specific connection" and yields
/// `Ok(None)`.
pub fn decode(socket_id: Option<&str>) -> Result<Option<SocketIdentifier>, SocketIdError> {
    let socket_id = match socket_id {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(None),
    };

    let result = decode_present(socket_id);
    if let Err(ref err) = result {
        warn!(fault = ?err.fault, "rejecting malformed socket id");
    }
    result.map(Some)
}

fn decode_present(socket_id: &str) -> Result<SocketIdentifier, SocketIdError> {
    let bytes = base64_decode(socket_id).map_err(SocketIdError::decoding)?;
    // objects only; a struct would also deserialize from a JSON array
    let object: Map<String, Value> =
        serde_json::from_slice(&bytes).map_err(SocketIdError::decoding)?;
    let raw: RawSocketId =
        serde_json::from_value(Value::Object(object)).map_err(SocketIdError::decoding)?;

    let connection_key = raw
        .connection_key
        .ok_or_else(|| SocketIdError::new(SocketIdFault::MissingConnectionKey))?;
    let client_id = raw
        .client_id
        .ok_or_else(|| SocketIdError::new(SocketIdFault::MissingClientId))?;

    Ok(SocketIdentifier {
        connection_key,
        client_id,
    })
}

/// Encode a socket id the way clients send it.
pub fn encode(socket_id: &SocketIdentifier) -> String {
    // two strings into an object: infallible
    let json = serde_json::to_vec(socket_id).unwrap_or_default();
    base64_encode(json)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(json: &str) -> String {
        base64_encode(json)
    }

    #[test]
    fn test_absent_socket_id() {
        assert_eq!(decode(None).unwrap(), None);
        assert_eq!(decode(Some("")).unwrap(), None);
    }

    #[test]
    fn test_identified_socket_id() {
        let id = b64(r#"{"connectionKey":"abc123","clientId":"user1"}"#);
        let decoded = decode(Some(id.as_str())).unwrap().unwrap();

        assert_eq!(decoded, SocketIdentifier::new("abc123", Some("user1".into())));
        assert!(decoded.is_identified());
    }

    #[test]
    fn test_anonymous_socket_id() {
        let id = b64(r#"{"connectionKey":"abc123","clientId":null}"#);
        let decoded = decode(Some(id.as_str())).unwrap().unwrap();

        assert_eq!(decoded.connection_key, "abc123");
        assert_eq!(decoded.client_id, None);
        assert!(!decoded.is_identified());
    }

    #[test]
    fn test_missing_connection_key() {
        let id = b64(r#"{"clientId":"user1"}"#);
        let err = decode(Some(id.as_str())).unwrap_err();

        assert_eq!(err.fault, SocketIdFault::MissingConnectionKey);
        assert!(err.to_string().starts_with("ConnectionKey is missing, "));
        assert!(err.to_string().ends_with(SOCKET_ID_HINT));
    }

    #[test]
    fn test_missing_client_id() {
        let id = b64(r#"{"connectionKey":"abc123"}"#);
        let err = decode(Some(id.as_str())).unwrap_err();

        assert_eq!(err.fault, SocketIdFault::MissingClientId);
        assert!(err.to_string().starts_with("ClientId is missing, "));
    }

    #[test]
    fn test_not_base64() {
        let err = decode(Some("%%% not base64 %%%")).unwrap_err();
        assert_eq!(err.fault, SocketIdFault::Decoding);
        assert!(err.to_string().starts_with("SocketId decoding failed, "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_json() {
        let err = decode(Some(b64("definitely not json").as_str())).unwrap_err();
        assert_eq!(err.fault, SocketIdFault::Decoding);
    }

    #[test]
    fn test_json_not_object() {
        let err = decode(Some(b64(r#"["abc123", "user1"]"#).as_str())).unwrap_err();
        assert_eq!(err.fault, SocketIdFault::Decoding);
    }

    #[test]
    fn test_connection_key_wrong_type() {
        let err = decode(Some(b64(r#"{"connectionKey":5,"clientId":null}"#).as_str())).unwrap_err();
        assert_eq!(err.fault, SocketIdFault::Decoding);
    }

    #[test]
    fn test_unpadded_input_accepted() {
        let id = b64(r#"{"connectionKey":"k","clientId":null}"#);
        let unpadded = id.trim_end_matches('=');
        assert!(decode(Some(unpadded)).unwrap().is_some());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let id = b64(r#"{"connectionKey":"k","clientId":"c","channel":"x"}"#);
        assert!(decode(Some(id.as_str())).unwrap().is_some());
    }

    #[test]
    fn test_encode_decode() {
        let original = SocketIdentifier::new("conn-1", None);
        let encoded = encode(&original);
        assert_eq!(decode(Some(encoded.as_str())).unwrap(), Some(original));

        let original = SocketIdentifier::new("conn-2", Some("alice".into()));
        let encoded = encode(&original);
        assert_eq!(decode(Some(encoded.as_str())).unwrap(), Some(original));
    }

    #[test]
    fn test_encode_keeps_null_client_id() {
        let encoded = encode(&SocketIdentifier::new("k", None));
        let json = base64_decode(&encoded).unwrap();
        assert_eq!(json, br#"{"connectionKey":"k","clientId":null}"#);
    }
}
