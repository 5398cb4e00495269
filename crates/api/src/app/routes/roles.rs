//! Role administration. Every endpoint requires the `admin` role scoped to
//! the country being touched (`""` for the cross-country listing).

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use gatehouse_auth::Role;

use crate::app::errors::auth_error_response;
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_all).put(upsert))
        .route("/:country", get(list_country))
        .route("/:country/:role", axum::routing::delete(delete_role))
}

async fn list_all(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[""]) {
        return denied;
    }
    match Role::get_all(services.roles.as_ref(), &[]) {
        Ok(roles) => (StatusCode::OK, Json(json!({ "roles": roles }))).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn list_country(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(country): Path<String>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[country.as_str()]) {
        return denied;
    }
    match Role::get_all(services.roles.as_ref(), std::slice::from_ref(&country)) {
        Ok(roles) => (StatusCode::OK, Json(json!({ "roles": roles }))).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn upsert(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(role): Json<Role>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[role.country.as_str()]) {
        return denied;
    }
    match role.to_db(services.roles.as_ref()) {
        Ok(()) => (StatusCode::OK, Json(json!({ "role": role }))).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn delete_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path((country, role)): Path<(String, String)>,
) -> Response {
    if let Err(denied) = ctx.require(&["admin"], &[country.as_str()]) {
        return denied;
    }
    match Role::delete(services.roles.as_ref(), &country, &role) {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "deleted" }))).into_response(),
        Err(e) => auth_error_response(e),
    }
}
