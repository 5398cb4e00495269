//! `gatehouse-infra` — adapters behind the domain's collaborator traits.
//!
//! A generic key-value store (with an in-memory implementation for dev and
//! tests), typed role/user store adapters over it, an Argon2 password hasher
//! and an HS256 token codec.

pub mod kv;
pub mod password;
pub mod stores;
pub mod token;

pub use kv::{Filter, InMemoryStore, Key, KeyValueStore, Record};
pub use password::Argon2Hasher;
pub use stores::{KvRoleStore, KvUserStore, ROLES_TABLE, USERS_TABLE};
pub use token::JwtCodec;
