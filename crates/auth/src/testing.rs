//! In-memory collaborator doubles shared by the unit suites.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{AuthError, AuthResult};
use crate::password::PasswordHasher;
use crate::role::Role;
use crate::store::{RoleStore, UserStore};
use crate::user::User;

#[derive(Default)]
pub(crate) struct MemoryRoleStore {
    inner: RwLock<BTreeMap<(String, String), Role>>,
}

impl MemoryRoleStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert without validation, for building fixtures.
    pub(crate) fn seed(&self, role: Role) {
        self.inner
            .write()
            .expect("lock poisoned")
            .insert((role.country.clone(), role.role.clone()), role);
    }
}

impl RoleStore for MemoryRoleStore {
    fn get(&self, country: &str, role: &str) -> AuthResult<Option<Role>> {
        let inner = self.inner.read().map_err(|_| AuthError::internal("lock poisoned"))?;
        Ok(inner.get(&(country.to_string(), role.to_string())).cloned())
    }

    fn put(&self, role: &Role) -> AuthResult<()> {
        let mut inner = self.inner.write().map_err(|_| AuthError::internal("lock poisoned"))?;
        inner.insert((role.country.clone(), role.role.clone()), role.clone());
        Ok(())
    }

    fn remove(&self, country: &str, role: &str) -> AuthResult<()> {
        let mut inner = self.inner.write().map_err(|_| AuthError::internal("lock poisoned"))?;
        inner.remove(&(country.to_string(), role.to_string()));
        Ok(())
    }

    fn list(&self, countries: &[String]) -> AuthResult<Vec<Role>> {
        let inner = self.inner.read().map_err(|_| AuthError::internal("lock poisoned"))?;
        Ok(inner
            .values()
            .filter(|r| countries.is_empty() || countries.contains(&r.country))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct MemoryUserStore {
    inner: RwLock<BTreeMap<String, User>>,
}

impl MemoryUserStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn seed(&self, user: User) {
        self.inner
            .write()
            .expect("lock poisoned")
            .insert(user.username.clone(), user);
    }
}

impl UserStore for MemoryUserStore {
    fn get(&self, username: &str) -> AuthResult<Option<User>> {
        let inner = self.inner.read().map_err(|_| AuthError::internal("lock poisoned"))?;
        Ok(inner.get(username).cloned())
    }

    fn put(&self, user: &User) -> AuthResult<()> {
        let mut inner = self.inner.write().map_err(|_| AuthError::internal("lock poisoned"))?;
        inner.insert(user.username.clone(), user.clone());
        Ok(())
    }

    fn remove(&self, username: &str) -> AuthResult<()> {
        let mut inner = self.inner.write().map_err(|_| AuthError::internal("lock poisoned"))?;
        inner.remove(username);
        Ok(())
    }

    fn contains(&self, username: &str) -> AuthResult<bool> {
        let inner = self.inner.read().map_err(|_| AuthError::internal("lock poisoned"))?;
        Ok(inner.contains_key(username))
    }

    fn list(&self, countries: &[String]) -> AuthResult<Vec<User>> {
        let inner = self.inner.read().map_err(|_| AuthError::internal("lock poisoned"))?;
        Ok(inner
            .values()
            .filter(|u| {
                countries.is_empty()
                    || u.assignments.iter().any(|a| countries.contains(&a.country))
            })
            .cloned()
            .collect())
    }
}

/// Transparent "hash" with a recognizable marker, so credential tests don't
/// need a real KDF.
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        Ok(format!("plain${plaintext}"))
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        hashed == format!("plain${plaintext}")
    }

    fn identify(&self, hashed: &str) -> bool {
        hashed.starts_with("plain$")
    }
}
