//! JSON error responses and the domain-error → status-code mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use gatehouse_auth::AuthError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": code, "message": message.into() }))).into_response()
}

/// Default mapping for errors bubbling out of the domain layer.
///
/// Credential failures are the caller's fault (401). Role-graph failures mean
/// stored data is broken and nothing the caller sent can fix it (500); the
/// detail goes to the log, not the response.
pub fn auth_error_response(err: AuthError) -> Response {
    match err {
        AuthError::InvalidCredential { .. } => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credential", err.to_string())
        }
        AuthError::InvalidRole { .. } | AuthError::CyclicRoleGraph { .. } => {
            tracing::error!(error = %err, "role graph is broken");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "broken_access_levels",
                "account has broken access levels",
            )
        }
        AuthError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            err.to_string(),
        ),
        AuthError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        AuthError::Internal(_) => {
            tracing::error!(error = %err, "internal failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

/// Mapping for upsert-style endpoints, where a credential error means the
/// submitted record failed validation rather than a failed login.
pub fn validation_error_response(err: AuthError) -> Response {
    match err {
        AuthError::InvalidCredential { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_record", err.to_string())
        }
        other => auth_error_response(other),
    }
}
