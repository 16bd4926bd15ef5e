use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use availability_backend::config::AppConfig;
use availability_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;
    let state = initialize_backend(&config).await?;
    let app = create_router(state, &config.allowed_origin)?;

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
