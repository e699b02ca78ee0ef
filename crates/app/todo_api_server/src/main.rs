//! Todo API server binary.
//!
//! Loads layered configuration, opens the configured store and serves the
//! REST API until SIGINT or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use todo_api::config::{ApiConfig, ConfigLayer};
use todo_api::{AppState, router};
use todo_core::repository::StorageBackend;
use todo_core::repository::memory::MemoryStore;
use todo_core::repository::postgres::PgStore;
use tracing::info;

/// CLI arguments. Every flag overrides the config file and environment.
#[derive(Parser, Debug)]
#[command(name = "todo_api_server", about = "Todo API server", version)]
struct Args {
    /// YAML config file.
    #[arg(long, env = "TODO_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. `0.0.0.0:8000`.
    #[arg(long)]
    bind: Option<String>,

    /// Storage backend (`postgres` or `memory`).
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// PostgreSQL connection URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long)]
    max_connections: Option<u32>,
}

impl Args {
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            bind_addr: self.bind.clone(),
            storage: self.storage,
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_api=debug,todo_core=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = ApiConfig::load_with(args.config.as_deref(), args.overrides())?;

    info!(
        bind_addr = %config.bind_addr,
        storage = %config.storage,
        token_ttl_secs = config.auth.token_ttl.num_seconds(),
        "starting todo_api_server"
    );

    let state = match config.storage {
        StorageBackend::Postgres => {
            info!(max_connections = config.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&config.database_url)
                .await?;

            info!("running database migrations");
            todo_core::migrate::migrate(&pool).await?;

            AppState::from_store(config.clone(), Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Memory => {
            info!("using in-memory store; data is lost on exit");
            AppState::from_store(config.clone(), Arc::new(MemoryStore::new()))
        }
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
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
    info!("shutdown signal received");
}
