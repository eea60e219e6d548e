//! Watch command implementation

use crate::api::ApiClient;
use crate::cli::{output, GlobalArgs, WatchArgs};
use crate::console::runtime::{watch, WatchOptions};
use crate::console::Console;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => return,
    }

    cancel_token.cancel();
}

/// Handle `guardian watch`
pub async fn run_watch(
    global: &GlobalArgs,
    args: &WatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let refresh_seconds = args
        .interval
        .filter(|secs| *secs > 0)
        .unwrap_or(config.refresh.interval_seconds);

    let options = WatchOptions {
        socket_url: config.backend.socket_url(),
        reconnect_delay: Duration::from_millis(config.backend.reconnect_delay_ms),
        refresh_interval: Duration::from_secs(refresh_seconds),
    };

    tracing::info!(backend = %config.backend.url, "Starting watch");

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(shutdown_signal(cancel.clone()));

    let mut console = Console::new(api, &config.refresh);
    let json = args.json;
    watch(&mut console, options, cancel.clone(), |console| {
        if json {
            match output::to_json(&output::DashboardSnapshot::capture(console)) {
                Ok(text) => println!("{}", text),
                Err(e) => tracing::warn!(error = %e, "Failed to encode snapshot"),
            }
        } else {
            // Clear screen, cursor home
            print!("\x1B[2J\x1B[H");
            println!("{}", output::format_dashboard(console));
        }
    })
    .await;

    cancel.cancel();
    if let Err(e) = signals.await {
        tracing::debug!(error = %e, "Signal listener ended abnormally");
    }

    tracing::info!("Watch stopped");
    Ok(())
}
