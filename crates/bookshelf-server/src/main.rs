//! # Bookshelf Server
//!
//! Main entry point: loads configuration, connects MySQL and Redis,
//! wires the DI module and serves the REST API until Ctrl+C or SIGTERM.

use bookshelf_config::{AppConfig, ConfigLoader};
use bookshelf_core::{BookshelfError, BookshelfResult};
use bookshelf_repository::{create_pool, DatabasePoolInterface};
use bookshelf_rest::create_router_from_module;
use bookshelf_server::{di::build_module, startup};
use bookshelf_service::create_redis_pool;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    startup::init_logging(&config.observability);
    startup::print_banner();

    info!("Starting Bookshelf server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> BookshelfResult<()> {
    let db_pool = create_pool(&config.database).await?;

    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let redis_pool = create_redis_pool(&config.redis)?;
    if redis_pool.is_none() {
        warn!("Redis disabled, book queries go straight to the database");
    }

    let module = build_module(&db_pool, redis_pool, &config.cache);
    let router = create_router_from_module(module.as_ref(), &config.server);

    startup::print_startup_info(&config);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BookshelfError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BookshelfError::Internal(format!("REST server error: {}", e)))?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

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
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
