//! EasyTaxi dispatch server
//!
//! # Usage
//!
//! ```bash
//! PORT=3000 RUST_LOG=easytaxi=debug cargo run --bin easytaxi
//! ```

use dispatch_core::environment::SystemClock;
use dispatch_web::cors_layer;
use easytaxi::{
    server::{build_router, AppState},
    Config, RideEnvironment, RideLedger, RideStore, Roster, StaticRoster,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("easytaxi=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        bind = %config.server.bind_address(),
        customers = config.roster.customers,
        drivers = config.roster.drivers,
        metrics = config.server.metrics_enabled,
        "Configuration loaded"
    );

    let metrics = if config.server.metrics_enabled {
        let handle = dispatch_runtime::metrics::install_recorder()?;
        easytaxi::metrics::register_business_metrics();
        Some(handle)
    } else {
        None
    };

    let roster: Arc<dyn Roster> = Arc::new(StaticRoster::numbered(
        config.roster.customers,
        config.roster.drivers,
    ));
    let ledger = RideLedger::new(RideEnvironment::new(
        Arc::new(SystemClock),
        Arc::clone(&roster),
    ));
    let store = ledger.store();

    let app = build_router(
        AppState::new(ledger, roster, metrics),
        cors_layer(&config.server.cors_allowed_origin)?,
    );

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    info!(address = %listener.local_addr()?, "EasyTaxi dispatch listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(store))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM, after marking the store as shutting down.
///
/// If a handler cannot be installed that branch never resolves, so the other
/// one still shuts the server down.
async fn shutdown_signal(store: Arc<RideStore>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
    store.begin_shutdown();
}
