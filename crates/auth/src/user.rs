//! User accounts and access aggregation.
//!
//! A user holds roles per country as an explicit list of `(country, role)`
//! assignments (duplicate countries allowed — a user can hold several roles
//! in one country). On login the assignments are expanded through the role
//! store into the access map that goes into the session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::access::AccessMap;
use crate::claims::TokenClaims;
use crate::error::{AuthError, AuthResult};
use crate::password::PasswordHasher;
use crate::role::Role;
use crate::store::{RoleStore, UserStore};
use crate::token::TokenCodec;

/// One role held in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub country: String,
    pub role: String,
}

impl RoleAssignment {
    pub fn new(country: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            role: role.into(),
        }
    }
}

/// Account lifecycle state.
///
/// A `new` user's username must be absent from the store; a `live` user's
/// must be present. The first successful write flips `new` to `live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    #[default]
    New,
    Live,
}

/// A user account. Identity is `username`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    /// Opaque hashed credential. Validation requires it to be a recognized
    /// hash format; plaintext never reaches the store.
    pub password: String,
    pub assignments: Vec<RoleAssignment>,
    #[serde(default)]
    pub state: UserState,
    /// Stamped on the first successful write.
    #[serde(default)]
    pub creation: Option<DateTime<Utc>>,
    /// Refreshed on every write.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    /// Free-form profile attributes. `data["TOKEN_LIFE"]` (seconds) overrides
    /// the global session length for this user.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl User {
    /// Construct an in-memory `new` user. Construction is pure; role
    /// resolution happens lazily in [`User::validate`] / [`User::get_access`].
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        assignments: Vec<RoleAssignment>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            assignments,
            state: UserState::New,
            creation: None,
            updated: None,
            data: Map::new(),
        }
    }

    /// Resolve every assignment to its stored role, failing fast on the
    /// first unresolvable pair.
    pub fn resolve_roles(&self, roles: &dyn RoleStore) -> AuthResult<Vec<Role>> {
        self.assignments
            .iter()
            .map(|a| Role::from_db(roles, &a.country, &a.role))
            .collect()
    }

    /// The complete per-country access map: for each country, the ordered,
    /// duplicate-free union of the closures of every role held there.
    pub fn get_access(&self, roles: &dyn RoleStore) -> AuthResult<AccessMap> {
        let mut access = AccessMap::new();
        for role in self.resolve_roles(roles)? {
            let names = role.all_access(roles)?;
            let held = access.entry(role.country.clone()).or_default();
            for name in names {
                if !held.contains(&name) {
                    held.push(name);
                }
            }
        }
        Ok(access)
    }

    /// Checks the account is acceptable to write.
    ///
    /// Fails with `InvalidCredential` for a username violating the new/live
    /// invariant, a password that is not a recognized hash, or a malformed
    /// email; propagates `InvalidRole` for structurally invalid assignments.
    pub fn validate(
        &self,
        roles: &dyn RoleStore,
        users: &dyn UserStore,
        hasher: &dyn PasswordHasher,
    ) -> AuthResult<()> {
        tracing::debug!(username = %self.username, "validating user");

        let exists = users.contains(&self.username)?;
        match self.state {
            UserState::New if exists => {
                return Err(AuthError::credential(
                    "username",
                    "a new username must not match a username in the store",
                ));
            }
            UserState::Live if !exists => {
                return Err(AuthError::credential(
                    "username",
                    "username must match a username in the store",
                ));
            }
            _ => {}
        }

        if !hasher.identify(&self.password) {
            return Err(AuthError::credential(
                "password",
                "password must be hashed according to the hashing policy",
            ));
        }

        for assignment in &self.assignments {
            Role::validate_role(roles, &assignment.country, &assignment.role)?;
        }

        if !is_valid_email(&self.email) {
            return Err(AuthError::credential("email", "malformed email address"));
        }

        Ok(())
    }

    /// Validate, then write the full record. A `new` user transitions to
    /// `live` and gets its `creation` stamp; `updated` is always refreshed.
    pub fn to_db(
        &mut self,
        roles: &dyn RoleStore,
        users: &dyn UserStore,
        hasher: &dyn PasswordHasher,
    ) -> AuthResult<()> {
        self.validate(roles, users, hasher)?;

        let now = Utc::now();
        if self.state == UserState::New {
            self.creation = Some(now);
            self.state = UserState::Live;
        }
        self.updated = Some(now);

        tracing::info!(username = %self.username, "writing user");
        users.put(self)
    }

    pub fn from_db(users: &dyn UserStore, username: &str) -> AuthResult<User> {
        tracing::debug!(%username, "loading user");
        let mut user = users
            .get(username)?
            .ok_or_else(|| AuthError::credential("username", "unknown username"))?;
        // A stored record is live by definition; repair stale `new` markers.
        user.state = UserState::Live;
        Ok(user)
    }

    pub fn delete(users: &dyn UserStore, username: &str) -> AuthResult<()> {
        tracing::info!(%username, "deleting user");
        users.remove(username)
    }

    /// Check the given credentials and return the account on success.
    pub fn authenticate(
        users: &dyn UserStore,
        hasher: &dyn PasswordHasher,
        username: &str,
        password: &str,
    ) -> AuthResult<User> {
        let user = User::from_db(users, username)?;
        if hasher.verify(password, &user.password) {
            Ok(user)
        } else {
            Err(AuthError::credential("password", "password does not match"))
        }
    }

    /// Session length for this user, in seconds.
    pub fn token_life(&self, default_secs: i64) -> i64 {
        match self.data.get("TOKEN_LIFE") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default_secs),
            Some(Value::String(s)) => s.parse().unwrap_or(default_secs),
            _ => default_secs,
        }
    }

    /// Assemble the claims for a session token expiring at `exp`.
    pub fn payload(&self, roles: &dyn RoleStore, exp: i64) -> AuthResult<TokenClaims> {
        Ok(TokenClaims {
            exp,
            acc: self.get_access(roles)?,
            usr: self.username.clone(),
            email: self.email.clone(),
            data: self.data.clone(),
        })
    }

    /// Sign a session token expiring at `exp` (unix seconds).
    pub fn get_jwt(
        &self,
        roles: &dyn RoleStore,
        codec: &dyn TokenCodec,
        exp: i64,
    ) -> AuthResult<String> {
        codec.encode(&self.payload(roles, exp)?)
    }

    /// Users attached to ANY of the given countries (empty = everyone).
    pub fn get_all(users: &dyn UserStore, countries: &[String]) -> AuthResult<Vec<User>> {
        users.list(countries)
    }

    /// Hash a plaintext password according to the hashing policy.
    pub fn hash_password(hasher: &dyn PasswordHasher, plaintext: &str) -> AuthResult<String> {
        hasher.hash(plaintext)
    }

    /// Load an existing user, replace its details (hashing the new
    /// password), validate and write, returning the final record.
    #[allow(clippy::too_many_arguments)]
    pub fn update_user(
        roles: &dyn RoleStore,
        users: &dyn UserStore,
        hasher: &dyn PasswordHasher,
        username: &str,
        email: &str,
        plaintext_password: &str,
        assignments: Vec<RoleAssignment>,
        data: Option<Map<String, Value>>,
    ) -> AuthResult<User> {
        let mut user = User::from_db(users, username)?;
        user.email = email.to_string();
        user.password = User::hash_password(hasher, plaintext_password)?;
        user.assignments = assignments;
        if let Some(data) = data {
            user.data = data;
        }
        user.to_db(roles, users, hasher)?;
        Ok(user)
    }
}

impl core::fmt::Display for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let access = self
            .assignments
            .iter()
            .map(|a| format!("({}|{})", a.country, a.role))
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "<User: {}({:?}) email: {} access: [{}]>",
            self.username, self.state, self.email, access
        )
    }
}

/// Simple `local@domain.tld` shape check.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
