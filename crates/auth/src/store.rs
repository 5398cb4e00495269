//! Store seams consumed by the domain.
//!
//! The concrete adapters (in-memory key-value store, and whatever backs it in
//! production) live in `gatehouse-infra`; the domain only sees these traits.

use crate::error::AuthResult;
use crate::role::Role;
use crate::user::User;

/// Storage for role records, keyed by (country, role).
pub trait RoleStore: Send + Sync {
    /// Fetch a single role. `Ok(None)` means "not present", which callers
    /// usually turn into [`crate::AuthError::InvalidRole`].
    fn get(&self, country: &str, role: &str) -> AuthResult<Option<Role>>;

    /// Upsert a role record (create and update are the same operation).
    fn put(&self, role: &Role) -> AuthResult<()>;

    fn remove(&self, country: &str, role: &str) -> AuthResult<()>;

    /// List roles for the given countries. An empty list means every country.
    fn list(&self, countries: &[String]) -> AuthResult<Vec<Role>>;
}

/// Storage for user records, keyed by username.
pub trait UserStore: Send + Sync {
    fn get(&self, username: &str) -> AuthResult<Option<User>>;

    fn put(&self, user: &User) -> AuthResult<()>;

    fn remove(&self, username: &str) -> AuthResult<()>;

    /// Cheap existence check, used by the new/live username invariant.
    fn contains(&self, username: &str) -> AuthResult<bool>;

    /// List users attached to ANY of the given countries (empty = everyone),
    /// de-duplicated by username.
    fn list(&self, countries: &[String]) -> AuthResult<Vec<User>>;
}
