// src/main.rs
use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use poll_backend::config::Config;
use poll_backend::postgres::PostgresPollStore;
use poll_backend::{db, routes};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(PostgresPollStore::new(pool.clone()));
    let app = routes::create_routes(store);

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    info!("Server running on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
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

    info!("Shutting down...");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
