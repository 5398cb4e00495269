//! Token-checking layer in front of protected routes.
//!
//! State machine: no token → 401; token present but expired/malformed → 403;
//! token valid → decoded claims bound to the request as [`AuthContext`]
//! (route-level access requirements are then checked by the handlers).
//! Role-requirement misses also surface as 403, via `AuthContext::require`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use gatehouse_auth::{TokenClaims, User, merge_claims};

use crate::app::errors::json_error;
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub async fn check_auth(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = get_token(req.headers(), &services.config.cookie_name) else {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "you have not authenticated yet; please log in first",
        );
    };

    let claims = match services.codec.decode(&token) {
        Ok(claims) => claims,
        // Any decode failure is a definite deny.
        Err(e) => return json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()),
    };

    let claims = enrich_claims(&services, &token, claims).await;

    req.extensions_mut().insert(AuthContext::new(claims));
    next.run(req).await
}

/// Token retrieval: the session cookie takes priority over an
/// `Authorization: Bearer` header when both are present.
pub(crate) fn get_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookie_token(headers, cookie_name).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Merge the full user payload under the token's own claims.
///
/// The token may have been re-signed with fresher, smaller claims than the
/// full user record, so token claims win per key. Payload lookup is local
/// when this service holds the user store, remote when an auth root is
/// configured; failure of either degrades to token-only claims — a warning,
/// never a request failure.
async fn enrich_claims(services: &AppServices, token: &str, claims: TokenClaims) -> TokenClaims {
    let user_payload = match local_payload(services, &claims) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!(username = %claims.usr, error = %e, "local user payload unavailable");
            remote_payload(services, token).await
        }
    };

    let Some(user_payload) = user_payload else {
        return claims;
    };

    let merged = merge_claims(user_payload, claims.to_value());
    match serde_json::from_value(merged) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(error = %e, "merged claims malformed; using token claims only");
            claims
        }
    }
}

fn local_payload(
    services: &AppServices,
    claims: &TokenClaims,
) -> gatehouse_auth::AuthResult<Value> {
    let user = User::from_db(services.users.as_ref(), &claims.usr)?;
    Ok(user
        .payload(services.roles.as_ref(), claims.exp)?
        .to_value())
}

async fn remote_payload(services: &AppServices, token: &str) -> Option<Value> {
    let root = services.config.auth_root.as_ref()?;
    let url = format!("{root}/api/get_user");

    let response = services
        .http
        .post(&url)
        .json(&serde_json::json!({ "jwt": token }))
        .send()
        .await;
    let response = match response {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(%url, error = %e, "remote user fetch failed; continuing degraded");
            return None;
        }
    };

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(%url, error = %e, "remote user response unreadable; continuing degraded");
            return None;
        }
    };

    let user_token = body.get("jwt")?.as_str()?;
    match services.codec.decode(user_token) {
        Ok(claims) => Some(claims.to_value()),
        Err(e) => {
            tracing::warn!(%url, error = %e, "remote user token invalid; continuing degraded");
            None
        }
    }
}
