//! DTI prediction server.
//!
//! Run with: cargo run -p dti-web

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dti_engine::{PredictionService, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::load()?;
    info!(artifacts_dir = %config.artifacts_dir.display(), "loading artifacts");
    let service = Arc::new(PredictionService::load(
        &config.artifacts_dir,
        config.cache_capacity,
    )?);

    let app = dti_web::router::build_router(service);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
