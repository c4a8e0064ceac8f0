use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_api::app::build_app;
use taskboard_api::config::{ConfigError, LogFormat, ServerConfig, StorageBackend};
use taskboard_api::state::AppState;
use taskboard_core::board::TaskBoard;
use taskboard_core::store::ProjectStore;
use taskboard_db::{MemoryStore, PgStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let log_format = config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or(LogFormat::Text);

    // --- Tracing ---
    init_tracing(log_format);

    let config = config.unwrap_or_else(|e| fatal("Invalid server configuration", e));
    tracing::info!(
        host = %config.host,
        port = config.port,
        storage = ?config.storage,
        environment = ?config.environment,
        "Loaded server configuration"
    );

    // --- Storage ---
    let store = build_store(&config).await;
    tracing::info!(backend = store.backend_name(), "Storage ready");

    // --- App state ---
    let addr_host = config.host.clone();
    let port = config.port;
    let state = AppState::new(TaskBoard::new(store), config);
    let app = build_app(state);

    // --- Start server ---
    let ip = addr_host
        .parse()
        .unwrap_or_else(|e| fatal("Invalid HOST address", e));
    let addr = SocketAddr::new(ip, port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| fatal("Failed to bind to address", e));

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        fatal("Server error", e);
    }

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskboard_api=debug,taskboard_core=debug,taskboard_db=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Pick the store named by `STORAGE_BACKEND`.
///
/// For PostgreSQL the pool is created, health-checked and migrated before
/// the server accepts traffic; any failure there aborts startup.
async fn build_store(config: &ServerConfig) -> Arc<dyn ProjectStore> {
    match config.storage {
        StorageBackend::Memory => {
            let store = if config.seed_demo_data {
                MemoryStore::with_demo_data()
            } else {
                MemoryStore::new()
            };
            Arc::new(store)
        }
        StorageBackend::Postgres => {
            let Some(database_url) = config.database_url.as_deref() else {
                fatal("Cannot start", ConfigError::MissingDatabaseUrl);
            };

            let pool = taskboard_db::create_pool(database_url)
                .await
                .unwrap_or_else(|e| fatal("Failed to connect to database", e));
            tracing::info!("Database connection pool created");

            taskboard_db::health_check(&pool)
                .await
                .unwrap_or_else(|e| fatal("Database health check failed", e));
            tracing::info!("Database health check passed");

            taskboard_db::run_migrations(&pool)
                .await
                .unwrap_or_else(|e| fatal("Failed to run database migrations", e));
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
    }
}

/// Log a startup failure and exit with a non-zero status.
fn fatal(context: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!(error = %err, "{context}");
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
