// src/main.rs
use dotenv::dotenv;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod common;
mod health;
mod logging_middleware;
mod organizations;
mod poller;
mod services;

#[cfg(test)]
mod test_support;

use common::config::log_config_summary;
use common::AppConfig;
use poller::Poller;
use services::monitoring::{init_sentry, MonitoringConfig};

/// How long shutdown waits for an in-flight poll cycle to finish
const POLLER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .with(sentry_tracing::layer())
        .init();

    let config = AppConfig::from_env();

    // Held until exit so queued events get flushed
    let _sentry_guard = init_sentry(&MonitoringConfig::from_app_config(&config));

    log_config_summary(&config);

    // ========================================================================
    // POLL LOOP
    // ========================================================================

    let http_client = services::http_client(config.http_timeout)?;
    let shutdown = CancellationToken::new();

    let poller = Poller::new(&config, http_client);
    let poll_task = tokio::spawn(poller.run(shutdown.child_token()));
    info!("Poll loop started");

    // ========================================================================
    // LIVENESS SERVER
    // ========================================================================

    let app = health::health_routes();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await?;

    // The server also returns early if it fails; stop polling either way.
    shutdown.cancel();

    match tokio::time::timeout(POLLER_SHUTDOWN_TIMEOUT, poll_task).await {
        Ok(Ok(())) => info!("Polling stopped by user"),
        Ok(Err(e)) => warn!(error = %e, "Poll task ended abnormally"),
        Err(_) => warn!(
            "Poll cycle still running after {}s, exiting anyway",
            POLLER_SHUTDOWN_TIMEOUT.as_secs()
        ),
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut term), Ok(mut int)) => {
                tokio::select! {
                    _ = term.recv() => {},
                    _ = int.recv() => {},
                }
            }
            _ => {
                warn!("Failed to install signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
