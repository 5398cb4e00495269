//! `gatehouse-api` — HTTP surface of the auth service.
//!
//! Layout:
//! - `app/`: router wiring, routes (one file per area), DTOs, error responses
//! - `middleware.rs`: the token-checking layer in front of protected routes
//! - `context.rs`: request-scoped auth context bound by the middleware
//! - `config.rs`: environment configuration

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;

pub use app::build_app;
pub use app::services::AppServices;
pub use config::ApiConfig;
