use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estates_api::config::{ServerConfig, StorageBackend};
use estates_api::router::build_app_router;
use estates_api::state::AppState;
use estates_core::media::MediaStore;
use estates_db::store::{JsonFileStore, PgPropertyStore, PropertyStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estates_api=debug,estates_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Listing store ---
    let store: Arc<dyn PropertyStore> = match &config.storage {
        StorageBackend::File { data_file } => {
            let store = JsonFileStore::new(data_file);
            let report = store
                .migrate()
                .await
                .expect("Failed to migrate listing data file");
            tracing::info!(
                path = %data_file.display(),
                total = report.total,
                changed = report.changed,
                "Listing data file ready"
            );
            Arc::new(store)
        }
        StorageBackend::Postgres { database_url } => {
            let pool = estates_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            estates_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            estates_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgPropertyStore::new(pool))
        }
    };

    // --- Media ---
    let media =
        MediaStore::new(&config.uploads_dir).with_base_url(config.media_base_url.clone());
    media
        .ensure_dirs()
        .await
        .expect("Failed to create upload directories");
    tracing::info!(root = %config.uploads_dir.display(), "Media directories ready");

    // --- Router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(store, Arc::new(media), config.clone());
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
