//! Router assembly.

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router, middleware::from_fn_with_state};

use services::AppServices;

/// Wire the full application: public endpoints under `/api`, admin
/// endpoints behind the token-checking middleware.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let protected = Router::new()
        .nest("/roles", routes::roles::router())
        .nest("/users", routes::users::router())
        .route_layer(from_fn_with_state(
            Arc::clone(&services),
            crate::middleware::check_auth,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::auth::router())
        .merge(protected)
        .layer(Extension(services))
}
