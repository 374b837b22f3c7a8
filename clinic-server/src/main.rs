use anyhow::Context;
use clinic_server::backend::{create_router, initialize_backend};
use clinic_server::config::AppConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting dental clinic service");
    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state, &config.allowed_origin)?;

    let listener = TcpListener::bind(config.bind_address.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Server listening on {}", config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
