//! Session token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::access::AccessMap;

/// Claims carried by a signed session token.
///
/// The wire shape is fixed — downstream services decode these fields by name:
/// `{"exp": <unix-seconds>, "acc": {country: [role, ...]}, "usr": <username>,
/// "email": <string>, "data": <object>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, unix seconds.
    pub exp: i64,

    /// Access map: every role (inherited included) per country.
    #[serde(default)]
    pub acc: AccessMap,

    /// Username.
    pub usr: String,

    #[serde(default)]
    pub email: String,

    /// Free-form profile attributes (may carry operational overrides such as
    /// a per-user token lifetime).
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl TokenClaims {
    /// Serialize to a JSON object for claim-level merging.
    pub fn to_value(&self) -> Value {
        // Claims are plain data; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Merge a remotely fetched user payload with a token's own claims.
///
/// Token claims take precedence on key collision — the token may have been
/// re-signed with fresher, smaller claims than the full user record.
pub fn merge_claims(remote_user: Value, token_payload: Value) -> Value {
    let mut merged = match remote_user {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(token) = token_payload {
        for (key, value) in token {
            merged.insert(key, value);
        }
    }
    Value::Object(merged)
}
