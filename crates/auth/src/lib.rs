//! `gatehouse-auth` — role-inheritance resolution and access-control decisions.
//!
//! This crate is intentionally decoupled from HTTP and storage: stores,
//! password hashing and token signing are collaborator traits implemented
//! elsewhere (see `gatehouse-infra`).

pub mod access;
pub mod claims;
pub mod error;
pub mod password;
pub mod role;
pub mod store;
pub mod token;
pub mod user;

#[cfg(test)]
mod props;
#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessMap, check_access, check_access_all};
pub use claims::{TokenClaims, merge_claims};
pub use error::{AuthError, AuthResult};
pub use password::PasswordHasher;
pub use role::Role;
pub use store::{RoleStore, UserStore};
pub use token::TokenCodec;
pub use user::{RoleAssignment, User, UserState};
