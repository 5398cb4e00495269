//! Environment configuration for the service.

use std::time::Duration;

fn from_env(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Cookie the session token is stored in.
    pub cookie_name: String,
    /// Default session length in seconds; users can override via
    /// `data["TOKEN_LIFE"]`.
    pub token_life: i64,
    /// Base URL of a remote auth service to fetch full user payloads from
    /// when the token's claims are slimmed down. `None` disables the fetch.
    pub auth_root: Option<String>,
    /// Timeout for the remote user fetch. Failures degrade, never block.
    pub remote_timeout: Duration,
    pub bind_addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cookie_name: "gatehouse_jwt".to_string(),
            token_life: 3600,
            auth_root: None,
            remote_timeout: Duration::from_secs(3),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cookie_name: from_env("JWT_COOKIE_NAME", &defaults.cookie_name),
            token_life: std::env::var("TOKEN_LIFE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_life),
            auth_root: std::env::var("AUTH_ROOT").ok().filter(|v| !v.is_empty()),
            remote_timeout: defaults.remote_timeout,
            bind_addr: from_env("BIND_ADDR", &defaults.bind_addr),
        }
    }
}
