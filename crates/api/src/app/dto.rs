//! Request/response bodies for the HTTP surface.

use serde::Deserialize;
use serde_json::{Map, Value};

use gatehouse_auth::{RoleAssignment, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GetUserRequest {
    pub jwt: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub username: String,
    pub email: String,
    /// Plaintext; hashed server-side before anything is stored.
    pub password: String,
    pub assignments: Vec<RoleAssignment>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub country: Option<String>,
}

/// A user record as returned to clients. The password hash never leaves
/// the service.
pub fn user_to_json(user: &User) -> Value {
    let mut value = serde_json::to_value(user).unwrap_or(Value::Null);
    if let Some(map) = value.as_object_mut() {
        map.remove("password");
    }
    value
}
