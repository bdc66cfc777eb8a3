//! # Emporium Server
//!
//! Main entry point: loads configuration, wires the PostgreSQL stores and
//! the Redis cache into the services, then serves the REST API until
//! Ctrl+C or SIGTERM.

use emporium_config::{AppConfig, ConfigLoader};
use emporium_core::{EmporiumError, EmporiumResult};
use emporium_repository::DatabasePoolInterface;
use emporium_rest::{create_router, AppState};
use emporium_server::{di, startup, telemetry};
use shaku::HasComponent;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_tracing(&config.observability) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    info!("Starting Emporium Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn load_config() -> EmporiumResult<AppConfig> {
    let config_loader = ConfigLoader::from_default_location()?;
    Ok(config_loader.get().await)
}

async fn run(config: AppConfig) -> EmporiumResult<()> {
    startup::print_banner();
    info!("Environment: {}", config.app.environment);

    let module = di::build_module(&config).await?;

    let mut state = AppState::from_module(module.as_ref(), &config.app);
    if config.observability.metrics_enabled {
        state = state.with_metrics(telemetry::init_metrics()?);
    }

    let router = create_router(state, &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EmporiumError::Internal(format!("Failed to bind {addr}: {e}")))?;

    startup::print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EmporiumError::Internal(format!("Server error: {e}")))?;

    let database: &dyn DatabasePoolInterface = module.resolve_ref();
    database.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, starting graceful shutdown");
}
