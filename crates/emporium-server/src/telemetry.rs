//! Logging and metrics setup.

use emporium_config::ObservabilityConfig;
use emporium_core::{EmporiumError, EmporiumResult};
use emporium_rest::middleware::HTTP_REQUESTS_TOTAL;
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset.
#[must_use]
pub fn default_directives(log_level: &str) -> String {
    format!("{log_level},emporium=debug,tower_http=debug,sqlx=warn")
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &ObservabilityConfig) -> EmporiumResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .try_init()
    };

    result.map_err(|e| EmporiumError::Configuration(format!("Failed to init tracing: {e}")))
}

/// Installs the Prometheus recorder and describes every counter.
pub fn init_metrics() -> EmporiumResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EmporiumError::Configuration(format!("Failed to install metrics recorder: {e}")))?;

    emporium_service::metrics::register_metrics();
    describe_counter!(HTTP_REQUESTS_TOTAL, "HTTP requests served");

    Ok(handle)
}
