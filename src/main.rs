//! Layer Cache - cleanup daemon
//!
//! Keeps a layered cache open and prunes its expired disk partitions on a
//! fixed interval until shut down.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use layer_cache::{spawn_cleanup_task, Config, LayerCache};

/// Main entry point for the cleanup daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to the remote store and open the disk root
/// 4. Run one cleanup pass, then start the periodic cleanup task
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "layer_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting layer cache cleanup daemon");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: store={}, ttl={}s, disk_path={}, retention={}d, cleanup_interval={}s",
        config.store_url(),
        config.store_entry_ttl,
        config.disk_path.display(),
        config.disk_retention_days,
        config.cleanup_interval
    );

    let cache = LayerCache::new(&config).context("failed to open layer cache")?;
    let removed = cache.clean().context("initial cleanup failed")?;
    info!("Initial cleanup removed {} expired partitions", removed);

    let cache = Arc::new(Mutex::new(cache));
    let cleanup_handle = spawn_cleanup_task(cache, config.cleanup_interval);

    shutdown_signal().await;

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
