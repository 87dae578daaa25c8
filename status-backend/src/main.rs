use status_backend::config::{self, ServiceConfig};
use status_backend::logging;
use status_backend::model::gatus::GatusClient;
use status_backend::module::status::{Presenter, StatusService};
use status_backend::server::{self, AppState};

use anyhow::Result;
use std::sync::Arc;

const LOG_PREFIX: &str = "stremio-status";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::var(config::CONFIG_PATH_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let config = ServiceConfig::load(&config_path)?;

    // Initialize logging
    let _logging_guard = logging::init_logging(
        &config.log_dir,
        LOG_PREFIX,
        &config.log_level,
        config.log_retention_days,
    )?;

    tracing::info!("Stremio Status starting...");
    tracing::info!(
        "Upstream monitor: {} (cache TTL {}s, timeout {}s)",
        config.health_base_url,
        config.cache_ttl_seconds,
        config.upstream_timeout_secs
    );

    // One pooled client for the life of the process
    let client = Arc::new(GatusClient::new(&config.health_base_url, config.upstream_timeout())?);
    let service = StatusService::new(
        client,
        config.cache_ttl(),
        Presenter::new(&config.public_base_url),
    );

    let address = config.server_address();
    let state = Arc::new(AppState { config, service });
    let app = server::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the last handle closes the upstream connection pool.
    drop(state);
    tracing::info!("Upstream client released, shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
