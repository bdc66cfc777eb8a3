//! Server startup utilities.

use emporium_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ______                           _
   / ____/___ ___  ____  ____  _____(_)_  ______ ___
  / __/ / __ `__ \/ __ \/ __ \/ ___/ / / / / __ `__ \
 / /___/ / / / / / /_/ / /_/ / /  / / /_/ / / / / / /
/_____/_/ /_/ /_/ .___/\____/_/  /_/\__,_/_/ /_/ /_/
               /_/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let port = config.server.port;
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Service:   {} v{} ({})", config.app.name, config.app.version, config.app.environment);
    info!("REST API:  http://{}/api/v1", config.server.addr());
    info!("Health:    http://0.0.0.0:{}/health", port);
    info!("API Docs:  http://0.0.0.0:{}/swagger-ui", port);
    if config.observability.metrics_enabled {
        info!("Metrics:   http://0.0.0.0:{}/metrics", port);
    }
    info!(
        "Cache:     {}",
        if config.redis.enabled { "redis" } else { "disabled" }
    );
    info!("{}", separator);
}
