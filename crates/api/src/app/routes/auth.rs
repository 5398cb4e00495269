//! Login, logout and the user-payload exchange endpoint.

use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde_json::json;

use gatehouse_auth::{AuthError, AuthResult, User};

use crate::app::dto::{GetUserRequest, LoginRequest};
use crate::app::errors::{auth_error_response, json_error};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/get_user", post(get_user))
        .route("/logout", get(logout))
}

async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let user = match User::authenticate(
        services.users.as_ref(),
        services.hasher.as_ref(),
        &body.username,
        &body.password,
    ) {
        Ok(user) => user,
        Err(AuthError::InvalidCredential { .. }) => {
            tracing::info!(username = %body.username, "login rejected");
            return json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credential",
                "incorrect username or password",
            );
        }
        Err(e) => return auth_error_response(e),
    };

    let exp = Utc::now().timestamp() + user.token_life(services.config.token_life);
    let token = match user.get_jwt(services.roles.as_ref(), services.codec.as_ref(), exp) {
        Ok(token) => token,
        Err(e) => return auth_error_response(e),
    };

    tracing::info!(username = %user.username, "login successful");
    let mut response =
        (StatusCode::OK, Json(json!({ "message": "successful", "jwt": token }))).into_response();
    if let Ok(cookie) = header::HeaderValue::from_str(&format!(
        "{}={token}; Path=/; HttpOnly",
        services.config.cookie_name
    )) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// Exchange any valid token for a short-lived one carrying the full,
/// current user payload. Peer services call this when their local copy of
/// the user is missing or stale.
async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<GetUserRequest>,
) -> Response {
    match fresh_user_token(&services, &body.jwt) {
        Ok(jwt) => (StatusCode::OK, Json(json!({ "jwt": jwt }))).into_response(),
        Err(e) => auth_error_response(e),
    }
}

fn fresh_user_token(services: &AppServices, token: &str) -> AuthResult<String> {
    let claims = services.codec.decode(token)?;
    let user = User::from_db(services.users.as_ref(), &claims.usr)?;
    // Thirty seconds: the caller decodes it immediately and discards it.
    let exp = Utc::now().timestamp() + 30;
    user.get_jwt(services.roles.as_ref(), services.codec.as_ref(), exp)
}

async fn logout(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let mut response =
        (StatusCode::OK, Json(json!({ "message": "logged out" }))).into_response();
    if let Ok(cookie) = header::HeaderValue::from_str(&format!(
        "{}=; Path=/; HttpOnly; Max-Age=0",
        services.config.cookie_name
    )) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
