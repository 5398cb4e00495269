//! Typed role/user store adapters over the generic key-value store.

use std::sync::Arc;

use serde_json::Value;

use gatehouse_auth::{AuthError, AuthResult, Role, RoleStore, User, UserStore};

use crate::kv::{Filter, Key, KeyValueStore, Record};

pub const ROLES_TABLE: &str = "auth_roles";
pub const USERS_TABLE: &str = "auth_users";

fn to_record<T: serde::Serialize>(value: &T) -> AuthResult<Record> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AuthError::internal("record did not serialize to an object")),
        Err(e) => Err(AuthError::internal(format!("serialize failed: {e}"))),
    }
}

fn from_record<T: serde::de::DeserializeOwned>(record: Record) -> AuthResult<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| AuthError::internal(format!("deserialize failed: {e}")))
}

/// Role records in the `auth_roles` table, composite (country, role) key.
#[derive(Clone)]
pub struct KvRoleStore {
    kv: Arc<dyn KeyValueStore>,
    table: String,
}

impl KvRoleStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            table: ROLES_TABLE.to_string(),
        }
    }

    pub fn with_table(kv: Arc<dyn KeyValueStore>, table: impl Into<String>) -> Self {
        Self {
            kv,
            table: table.into(),
        }
    }

    fn key(country: &str, role: &str) -> Key {
        Key::from([
            ("country".to_string(), country.to_string()),
            ("role".to_string(), role.to_string()),
        ])
    }
}

impl RoleStore for KvRoleStore {
    fn get(&self, country: &str, role: &str) -> AuthResult<Option<Role>> {
        self.kv
            .read(&self.table, &Self::key(country, role))?
            .map(from_record)
            .transpose()
    }

    fn put(&self, role: &Role) -> AuthResult<()> {
        self.kv.write(
            &self.table,
            &Self::key(&role.country, &role.role),
            to_record(role)?,
        )
    }

    fn remove(&self, country: &str, role: &str) -> AuthResult<()> {
        self.kv.delete(&self.table, &Self::key(country, role))
    }

    fn list(&self, countries: &[String]) -> AuthResult<Vec<Role>> {
        let filter = (!countries.is_empty()).then(|| Filter::new("country", countries.to_vec()));
        self.kv
            .get_all(&self.table, filter.as_ref())?
            .into_iter()
            .map(from_record)
            .collect()
    }
}

/// User records in the `auth_users` table, keyed by username.
#[derive(Clone)]
pub struct KvUserStore {
    kv: Arc<dyn KeyValueStore>,
    table: String,
}

impl KvUserStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            table: USERS_TABLE.to_string(),
        }
    }

    pub fn with_table(kv: Arc<dyn KeyValueStore>, table: impl Into<String>) -> Self {
        Self {
            kv,
            table: table.into(),
        }
    }

    fn key(username: &str) -> Key {
        Key::from([("username".to_string(), username.to_string())])
    }
}

impl UserStore for KvUserStore {
    fn get(&self, username: &str) -> AuthResult<Option<User>> {
        self.kv
            .read(&self.table, &Self::key(username))?
            .map(from_record)
            .transpose()
    }

    fn put(&self, user: &User) -> AuthResult<()> {
        self.kv
            .write(&self.table, &Self::key(&user.username), to_record(user)?)
    }

    fn remove(&self, username: &str) -> AuthResult<()> {
        self.kv.delete(&self.table, &Self::key(username))
    }

    fn contains(&self, username: &str) -> AuthResult<bool> {
        Ok(self.kv.read(&self.table, &Self::key(username))?.is_some())
    }

    fn list(&self, countries: &[String]) -> AuthResult<Vec<User>> {
        let filter = (!countries.is_empty())
            .then(|| Filter::object_key("assignments", "country", countries.to_vec()));
        self.kv
            .get_all(&self.table, filter.as_ref())?
            .into_iter()
            .map(from_record)
            .collect()
    }
}
