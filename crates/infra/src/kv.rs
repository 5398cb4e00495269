//! Generic key-value storage.
//!
//! Records are JSON objects, keys are string maps (the roles table uses a
//! composite country+role key, the users table a single username key). The
//! production backend is swappable; the in-memory implementation here backs
//! dev and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;

use gatehouse_auth::{AuthError, AuthResult};

/// A stored record: a flat JSON object.
pub type Record = serde_json::Map<String, Value>;

/// A primary key: field name → value. `BTreeMap` so composite keys have a
/// stable field order.
pub type Key = BTreeMap<String, String>;

/// Scan filter: keep records where `field` equals one of `values`, or is a
/// list containing one of them. For lists of objects, `key` names the one
/// object field to compare; without it an object never matches.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub key: Option<String>,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            key: None,
            values,
        }
    }

    /// Filter a list-of-objects field on a single object key.
    pub fn object_key(
        field: impl Into<String>,
        key: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self {
            field: field.into(),
            key: Some(key.into()),
            values,
        }
    }
}

pub trait KeyValueStore: Send + Sync {
    fn read(&self, table: &str, key: &Key) -> AuthResult<Option<Record>>;

    /// Upsert: the key fields are merged into the stored attributes.
    fn write(&self, table: &str, key: &Key, attributes: Record) -> AuthResult<()>;

    fn delete(&self, table: &str, key: &Key) -> AuthResult<()>;

    /// Full scan, optionally filtered. `None` returns every record.
    fn get_all(&self, table: &str, filter: Option<&Filter>) -> AuthResult<Vec<Record>>;
}

/// In-memory key-value store. Intended for tests/dev; not optimized.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, BTreeMap<String, Record>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_key(key: &Key) -> String {
        key.iter()
            .map(|(field, value)| format!("{field}:{value}"))
            .collect::<Vec<_>>()
            .join("-")
    }

    fn matches(record: &Record, filter: &Filter) -> bool {
        match record.get(&filter.field) {
            Some(Value::String(s)) => filter.values.iter().any(|v| v == s),
            Some(Value::Array(items)) => items.iter().any(|item| match item {
                Value::String(s) => filter.values.iter().any(|v| v == s),
                // Lists of objects compare on the named key only, so a
                // filter on assignment countries cannot match role names.
                Value::Object(obj) => filter.key.as_ref().is_some_and(|key| {
                    matches!(
                        obj.get(key),
                        Some(Value::String(s)) if filter.values.iter().any(|w| w == s)
                    )
                }),
                _ => false,
            }),
            _ => false,
        }
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, table: &str, key: &Key) -> AuthResult<Option<Record>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| AuthError::internal("lock poisoned"))?;
        Ok(tables
            .get(table)
            .and_then(|t| t.get(&Self::build_key(key)))
            .cloned())
    }

    fn write(&self, table: &str, key: &Key, mut attributes: Record) -> AuthResult<()> {
        for (field, value) in key {
            attributes.insert(field.clone(), Value::String(value.clone()));
        }
        let mut tables = self
            .tables
            .write()
            .map_err(|_| AuthError::internal("lock poisoned"))?;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(Self::build_key(key), attributes);
        Ok(())
    }

    fn delete(&self, table: &str, key: &Key) -> AuthResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| AuthError::internal("lock poisoned"))?;
        if let Some(t) = tables.get_mut(table) {
            t.remove(&Self::build_key(key));
        }
        Ok(())
    }

    fn get_all(&self, table: &str, filter: Option<&Filter>) -> AuthResult<Vec<Record>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| AuthError::internal("lock poisoned"))?;
        let Some(t) = tables.get(table) else {
            return Ok(Vec::new());
        };
        Ok(t.values()
            .filter(|record| filter.is_none_or(|f| Self::matches(record, f)))
            .cloned()
            .collect())
    }
}
