//! Role records and the inheritance resolver.
//!
//! A role is a country-scoped permission bundle that inherits access from its
//! `parents`. Resolution expands a role into its full transitive closure by
//! walking parent links through the store. Every ancestor is fetched fresh on
//! every call — deliberately expensive, so updates to ancestors are always
//! reflected and structural integrity is re-checked each time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::store::RoleStore;

/// A single access role. Identity is `(country, role)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub country: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
    /// Roles (same country) this role inherits access from. Callers list
    /// privileged roles first, so "higher access" appears earlier in the
    /// resolved closure.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Roles required to even see or hand out this role. Empty means
    /// unrestricted. Does not affect closure computation.
    #[serde(default)]
    pub visible: Vec<String>,
}

impl Role {
    pub fn new(
        country: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
        parents: Vec<String>,
    ) -> Self {
        Self {
            country: country.into(),
            role: role.into(),
            description: description.into(),
            parents,
            visible: Vec::new(),
        }
    }

    /// Checks this role is acceptable to write: its entire ancestor chain
    /// must resolve. Implemented by computing the closure and letting any
    /// missing lookup propagate as `InvalidRole`.
    pub fn validate(&self, store: &dyn RoleStore) -> AuthResult<()> {
        tracing::debug!(country = %self.country, role = %self.role, "validating role");
        self.all_access_objs(store)?;
        Ok(())
    }

    /// The ordered, duplicate-free list of roles reachable from this one via
    /// `parents`, including itself (self first, then each parent's closure
    /// depth-first; only the first occurrence of a role is kept).
    ///
    /// Ancestors are fetched fresh from the store; this role itself is used
    /// as given, so a not-yet-written role can be validated before its first
    /// write. A missing ancestor fails with `InvalidRole`; a parent chain
    /// that loops back into the current traversal path fails with
    /// `CyclicRoleGraph`.
    pub fn all_access_objs(&self, store: &dyn RoleStore) -> AuthResult<Vec<Role>> {
        let mut closure = Vec::new();
        let mut seen = HashSet::new();
        let mut path = Vec::new();
        self.collect(store, &mut closure, &mut seen, &mut path)?;
        Ok(closure)
    }

    fn collect(
        &self,
        store: &dyn RoleStore,
        closure: &mut Vec<Role>,
        seen: &mut HashSet<(String, String)>,
        path: &mut Vec<(String, String)>,
    ) -> AuthResult<()> {
        let key = (self.country.clone(), self.role.clone());
        if path.contains(&key) {
            return Err(AuthError::cycle(&self.country, &self.role));
        }
        if !seen.insert(key.clone()) {
            // Already collected via another parent path.
            return Ok(());
        }
        closure.push(self.clone());
        path.push(key);
        for parent in &self.parents {
            let parent_obj = store.get(&self.country, parent)?.ok_or_else(|| {
                AuthError::role(&self.country, parent, "role not found in the store")
            })?;
            parent_obj.collect(store, closure, seen, path)?;
        }
        path.pop();
        Ok(())
    }

    /// Same as [`Role::all_access_objs`], mapped to role names.
    pub fn all_access(&self, store: &dyn RoleStore) -> AuthResult<Vec<String>> {
        Ok(self
            .all_access_objs(store)?
            .into_iter()
            .map(|r| r.role)
            .collect())
    }

    /// Validate, then upsert this role.
    pub fn to_db(&self, store: &dyn RoleStore) -> AuthResult<()> {
        self.validate(store)?;
        tracing::info!(country = %self.country, role = %self.role, "writing role");
        store.put(self)
    }

    pub fn from_db(store: &dyn RoleStore, country: &str, role: &str) -> AuthResult<Role> {
        tracing::debug!(%country, %role, "loading role");
        store
            .get(country, role)?
            .ok_or_else(|| AuthError::role(country, role, "role not found in the store"))
    }

    pub fn delete(store: &dyn RoleStore, country: &str, role: &str) -> AuthResult<()> {
        tracing::info!(%country, %role, "deleting role");
        store.remove(country, role)
    }

    /// Check that a stored role exists and has a complete ancestor chain.
    pub fn validate_role(store: &dyn RoleStore, country: &str, role: &str) -> AuthResult<()> {
        Role::from_db(store, country, role)?.validate(store)
    }

    /// All roles for the given countries; an empty list means every country.
    pub fn get_all(store: &dyn RoleStore, countries: &[String]) -> AuthResult<Vec<Role>> {
        store.list(countries)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.country, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryRoleStore;

    /// registered <- personal, registered <- shared, {personal, shared} <- manager
    fn diamond_store() -> MemoryRoleStore {
        let store = MemoryRoleStore::new();
        store.seed(Role::new("demo", "registered", "Registered.", vec![]));
        store.seed(Role::new(
            "demo",
            "personal",
            "Personal.",
            vec!["registered".to_string()],
        ));
        store.seed(Role::new(
            "demo",
            "shared",
            "Shared.",
            vec!["registered".to_string()],
        ));
        store.seed(Role::new(
            "demo",
            "manager",
            "Manager.",
            vec!["personal".to_string(), "shared".to_string()],
        ));
        store
    }

    #[test]
    fn closure_includes_self_and_all_ancestors_once() {
        let store = diamond_store();
        let manager = Role::from_db(&store, "demo", "manager").unwrap();

        let access = manager.all_access(&store).unwrap();
        assert_eq!(access.len(), 4);
        for role in ["manager", "personal", "registered", "shared"] {
            assert_eq!(access.iter().filter(|r| *r == role).count(), 1, "{role}");
        }
    }

    #[test]
    fn closure_is_depth_first_self_first() {
        let store = diamond_store();
        let manager = Role::from_db(&store, "demo", "manager").unwrap();

        let access = manager.all_access(&store).unwrap();
        assert_eq!(access, vec!["manager", "personal", "registered", "shared"]);
    }

    #[test]
    fn leaf_closure_is_itself() {
        let store = diamond_store();
        let registered = Role::from_db(&store, "demo", "registered").unwrap();
        assert_eq!(registered.all_access(&store).unwrap(), vec!["registered"]);
    }

    #[test]
    fn missing_ancestor_is_invalid() {
        let store = diamond_store();
        Role::delete(&store, "demo", "shared").unwrap();

        let manager = Role::from_db(&store, "demo", "manager").unwrap();
        let err = manager.validate(&store).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidRole { country, role, .. }
                if country == "demo" && role == "shared"
        ));
    }

    #[test]
    fn transitively_missing_ancestor_is_invalid() {
        let store = diamond_store();
        Role::delete(&store, "demo", "registered").unwrap();

        let err = Role::validate_role(&store, "demo", "manager").unwrap_err();
        assert!(matches!(err, AuthError::InvalidRole { role, .. } if role == "registered"));
    }

    #[test]
    fn unknown_role_is_invalid() {
        let store = diamond_store();
        let err = Role::from_db(&store, "demo", "nonexistent").unwrap_err();
        assert!(matches!(err, AuthError::InvalidRole { .. }));
    }

    #[test]
    fn parents_resolve_within_their_own_country() {
        let store = diamond_store();
        // Same role title, different country: must not satisfy the lookup.
        let jordan_manager = Role::new("jordan", "manager", "", vec!["personal".to_string()]);
        let err = jordan_manager.validate(&store).unwrap_err();
        assert!(matches!(err, AuthError::InvalidRole { country, .. } if country == "jordan"));
    }

    #[test]
    fn unwritten_role_validates_against_stored_parents() {
        let store = diamond_store();
        let draft = Role::new("demo", "director", "Draft.", vec!["manager".to_string()]);

        let access = draft.all_access(&store).unwrap();
        assert_eq!(
            access,
            vec!["director", "manager", "personal", "registered", "shared"]
        );
    }

    #[test]
    fn to_db_rejects_broken_chain_and_writes_valid_roles() {
        let store = diamond_store();

        let broken = Role::new("demo", "central", "", vec!["missing".to_string()]);
        assert!(broken.to_db(&store).is_err());
        assert!(store.get("demo", "central").unwrap().is_none());

        let valid = Role::new("demo", "central", "", vec!["manager".to_string()]);
        valid.to_db(&store).unwrap();
        assert_eq!(store.get("demo", "central").unwrap().unwrap(), valid);
    }

    #[test]
    fn self_cycle_fails_fast() {
        let store = MemoryRoleStore::new();
        store.seed(Role::new("demo", "loop", "", vec!["loop".to_string()]));

        let err = Role::validate_role(&store, "demo", "loop").unwrap_err();
        assert!(matches!(err, AuthError::CyclicRoleGraph { role, .. } if role == "loop"));
    }

    #[test]
    fn two_node_cycle_fails_fast() {
        let store = MemoryRoleStore::new();
        store.seed(Role::new("demo", "a", "", vec!["b".to_string()]));
        store.seed(Role::new("demo", "b", "", vec!["a".to_string()]));

        let err = Role::validate_role(&store, "demo", "a").unwrap_err();
        assert!(matches!(err, AuthError::CyclicRoleGraph { .. }));
    }

    #[test]
    fn diamond_is_not_reported_as_cycle() {
        let store = diamond_store();
        assert!(Role::validate_role(&store, "demo", "manager").is_ok());
    }

    #[test]
    fn get_all_filters_by_country() {
        let store = diamond_store();
        store.seed(Role::new("jordan", "clinic", "", vec![]));

        let demo = Role::get_all(&store, &["demo".to_string()]).unwrap();
        assert_eq!(demo.len(), 4);
        assert!(demo.iter().all(|r| r.country == "demo"));

        let all = Role::get_all(&store, &[]).unwrap();
        assert_eq!(all.len(), 5);
    }
}
