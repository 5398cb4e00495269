//! Shared service handles threaded through the router.

use std::sync::Arc;

use gatehouse_auth::{PasswordHasher, RoleStore, TokenCodec, UserStore};
use gatehouse_infra::{Argon2Hasher, InMemoryStore, JwtCodec, KeyValueStore, KvRoleStore, KvUserStore};

use crate::config::ApiConfig;

pub struct AppServices {
    pub roles: Arc<dyn RoleStore>,
    pub users: Arc<dyn UserStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub codec: Arc<dyn TokenCodec>,
    pub http: reqwest::Client,
    pub config: ApiConfig,
}

impl AppServices {
    pub fn new(
        roles: Arc<dyn RoleStore>,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<dyn TokenCodec>,
        config: ApiConfig,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.remote_timeout)
            .build()?;
        Ok(Self { roles, users, hasher, codec, http, config })
    }

    /// Fully in-process wiring over the in-memory store. Used by the binary
    /// until a persistent backend is configured, and by the API tests.
    pub fn in_memory(jwt_secret: &[u8], config: ApiConfig) -> anyhow::Result<Self> {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self::new(
            Arc::new(KvRoleStore::new(Arc::clone(&kv))),
            Arc::new(KvUserStore::new(kv)),
            Arc::new(Argon2Hasher::new()),
            Arc::new(JwtCodec::hs256(jwt_secret)),
            config,
        )
    }
}
