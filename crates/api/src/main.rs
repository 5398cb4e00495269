use std::sync::Arc;

use gatehouse_api::{ApiConfig, AppServices, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gatehouse_observability::init();

    let config = ApiConfig::from_env();
    let secret = match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!("JWT_SECRET not set; using a development secret");
            "dev-secret".to_string()
        }
    };

    let services = Arc::new(AppServices::in_memory(secret.as_bytes(), config.clone())?);
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
