use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remoterun_server::api;
use remoterun_server::config::Config;
use remoterun_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remoterun_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting remoterun server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    tokio::fs::create_dir_all(&config.logs_dir)
        .await
        .with_context(|| format!("Failed to create log directory {:?}", config.logs_dir))?;

    tracing::info!("Writing task logs to {:?}", config.logs_dir);

    // Build router with all API endpoints
    let app = api::create_router(AppState::new(&config));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
