//! User administration.
//!
//! Beyond the blanket `admin` requirement, mutating or reading a specific
//! account demands that the caller's own access covers every role the
//! target holds, in the target's countries. An admin for one country can
//! not grant or inspect access in another.

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use gatehouse_auth::{AuthError, RoleAssignment, User, UserStore};

use crate::app::dto::{ListUsersQuery, UpsertUserRequest, user_to_json};
use crate::app::errors::{auth_error_response, json_error, validation_error_response};
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).put(upsert))
        .route("/:username", get(get_one).delete(delete_user))
}

fn require_ownership(ctx: &AuthContext, assignments: &[RoleAssignment]) -> Result<(), Response> {
    let roles: Vec<&str> = assignments.iter().map(|a| a.role.as_str()).collect();
    let countries: Vec<&str> = assignments.iter().map(|a| a.country.as_str()).collect();
    ctx.require_all(&roles, &countries)
}

fn load_user(users: &dyn UserStore, username: &str) -> Result<User, Response> {
    match User::from_db(users, username) {
        Ok(user) => Ok(user),
        Err(AuthError::InvalidCredential { .. }) => Err(json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no such user: {username}"),
        )),
        Err(e) => Err(auth_error_response(e)),
    }
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ListUsersQuery>,
) -> Response {
    let country = query.country.unwrap_or_default();
    if let Err(denied) = ctx.require(&["admin"], &[country.as_str()]) {
        return denied;
    }
    let countries = if country.is_empty() { vec![] } else { vec![country] };
    match User::get_all(services.users.as_ref(), &countries) {
        Ok(users) => {
            let users: Vec<_> = users.iter().map(user_to_json).collect();
            (StatusCode::OK, Json(json!({ "users": users }))).into_response()
        }
        Err(e) => auth_error_response(e),
    }
}

async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(username): Path<String>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[""]) {
        return denied;
    }
    let user = match load_user(services.users.as_ref(), &username) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if let Err(denied) = require_ownership(&ctx, &user.assignments) {
        return denied;
    }
    (StatusCode::OK, Json(json!({ "user": user_to_json(&user) }))).into_response()
}

async fn upsert(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<UpsertUserRequest>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[""]) {
        return denied;
    }
    if let Err(denied) = require_ownership(&ctx, &body.assignments) {
        return denied;
    }

    let exists = match services.users.contains(&body.username) {
        Ok(exists) => exists,
        Err(e) => return auth_error_response(e),
    };

    let result = if exists {
        // The caller must cover what the account holds now, not just what
        // the request would leave it with.
        let current = match load_user(services.users.as_ref(), &body.username) {
            Ok(user) => user,
            Err(response) => return response,
        };
        if let Err(denied) = require_ownership(&ctx, &current.assignments) {
            return denied;
        }
        User::update_user(
            services.roles.as_ref(),
            services.users.as_ref(),
            services.hasher.as_ref(),
            &body.username,
            &body.email,
            &body.password,
            body.assignments,
            body.data,
        )
    } else {
        create_user(&services, body)
    };

    match result {
        Ok(user) => (StatusCode::OK, Json(json!({ "user": user_to_json(&user) }))).into_response(),
        Err(e) => validation_error_response(e),
    }
}

fn create_user(
    services: &AppServices,
    body: UpsertUserRequest,
) -> gatehouse_auth::AuthResult<User> {
    let password = User::hash_password(services.hasher.as_ref(), &body.password)?;
    let mut user = User::new(body.username, body.email, password, body.assignments);
    if let Some(data) = body.data {
        user.data = data;
    }
    user.to_db(
        services.roles.as_ref(),
        services.users.as_ref(),
        services.hasher.as_ref(),
    )?;
    Ok(user)
}

async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(username): Path<String>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[""]) {
        return denied;
    }
    let user = match load_user(services.users.as_ref(), &username) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if let Err(denied) = require_ownership(&ctx, &user.assignments) {
        return denied;
    }
    match User::delete(services.users.as_ref(), &username) {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "deleted" }))).into_response(),
        Err(e) => auth_error_response(e),
    }
}
