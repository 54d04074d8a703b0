//! Rooftop Duel - headless sniper duel simulation
//!
//! Runs one duel session in real time and exposes it over a JSON-lines
//! harness:
//! - commands (fire, reload, move, scope, continue...) read from stdin
//! - presentation events and periodic snapshots written to stdout

mod config;
mod control;
mod game;
mod util;

use std::time::Duration;

use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};
use crate::game::{Duel, DuelSession};

/// How long the feed may keep writing after the session stops
const FEED_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    info!(
        mode = %config.mode,
        weapon = %config.weapon,
        rounds = config.rounds,
        seed = config.seed,
        map = %config.environment.map,
        "Starting Rooftop Duel"
    );

    let duel = Duel::new(config.duel_settings());
    let (session, handle) = DuelSession::new(duel, config.time_scale);
    let feed_rx = handle.subscribe();
    let mut session_task = tokio::spawn(session.run());

    let mut control_task = tokio::spawn(control::handler::run(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        handle.clone(),
        feed_rx,
    ));

    tokio::select! {
        _ = shutdown_signal() => {
            let _ = handle.send(control::protocol::DuelCommand::Shutdown).await;
            let _ = (&mut session_task).await;
        }
        _ = &mut session_task => {}
    }

    // Give the feed writer a moment to flush once the session has stopped
    drop(handle);
    match tokio::time::timeout(FEED_DRAIN_TIMEOUT, &mut control_task).await {
        Ok(Ok(Err(e))) => error!(error = %e, "Control harness failed"),
        Ok(_) => {}
        Err(_) => control_task.abort(),
    }

    info!("Duel shutdown complete");
    Ok(())
}

/// Initialize tracing/logging. Logs go to stderr so stdout stays a clean feed.
fn init_tracing(log_level: &str, format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
