//! Request-scoped authentication context.

use axum::http::StatusCode;
use axum::response::Response;

use gatehouse_auth::{TokenClaims, check_access, check_access_all};

use crate::app::errors::json_error;

/// Decoded (and possibly remote-enriched) claims for the current request,
/// bound by the auth middleware once the token has verified.
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: TokenClaims,
}

impl AuthContext {
    pub fn new(claims: TokenClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    pub fn username(&self) -> &str {
        &self.claims.usr
    }

    /// Route gate: ANY of the required `(role, country)` pairs grants access.
    pub fn require(&self, roles: &[&str], countries: &[&str]) -> Result<(), Response> {
        if check_access(roles, countries, &self.claims.acc) {
            Ok(())
        } else {
            Err(json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                format!("user doesn't have required access levels: {}", roles.join(", ")),
            ))
        }
    }

    /// Ownership gate: EVERY required `(role, country)` pair must hold.
    pub fn require_all(&self, roles: &[&str], countries: &[&str]) -> Result<(), Response> {
        if check_access_all(roles, countries, &self.claims.acc) {
            Ok(())
        } else {
            Err(json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "user's access does not cover the target account",
            ))
        }
    }
}
