//! Server startup utilities.

use bookshelf_config::{AppConfig, ObservabilityConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// if a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .is_ok()
    }
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____              __        __         ____
   / __ )____  ____  / /_______/ /_  ___  / / __/
  / __  / __ \/ __ \/ //_/ ___/ __ \/ _ \/ / /_
 / /_/ / /_/ / /_/ / ,< (__  ) / / /  __/ / __/
/_____/\____/\____/_/|_/____/_/ /_/\___/_/_/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let addr = config.server.addr();
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:  http://{}/api/books", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!(
        "Cache:     {} (default TTL {}s, list TTL {}s)",
        if config.redis.enabled { "redis" } else { "disabled" },
        config.cache.default_ttl_secs,
        config.cache.list_ttl_secs
    );
    info!("{}", separator);
}
