mod bootstrap;
mod health;
mod mailer;
mod routes;

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Result;
use cupid_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use cupid_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let state = routes::AppState {
        catalog: app.catalog.clone(),
        suggester: app.suggestions.clone(),
        mailer: app.mailer.clone(),
        routing: app.routing.clone(),
        directory: app.directory.clone(),
    };
    let health_state =
        health::HealthState::new(app.catalog.clone(), app.suggestions.is_configured());

    let router = routes::router(state).merge(health::router(health_state));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        "cupid-server listening"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .into_future(),
    );

    tokio::signal::ctrl_c().await?;
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    tracing::info!(
        event_name = "system.server.stopping",
        grace_secs = grace.as_secs(),
        "shutdown signal received, draining connections"
    );
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                "connections still open after the grace period, stopping anyway"
            );
        }
    }

    tracing::info!(event_name = "system.server.stopped", "cupid-server stopped");
    Ok(())
}
