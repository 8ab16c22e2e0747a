mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::services::link_check::LinkChecker;
use crate::services::music_info::MusicInfoClient;
use crate::services::CatalogService;
use sqlx::PgPool;

/// Application state shared across handlers
pub struct AppState {
    pub pool: PgPool,
    pub catalog: CatalogService,
    pub start_time: Instant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songlib_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Songlib Server v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL connection pool
    let pool = create_pool(&config).await?;
    tracing::info!("PostgreSQL connected");

    // Run database migrations
    run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize services
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let music_info = MusicInfoClient::new(&config.music_info_url, timeout);
    tracing::info!("Music info provider: {}", config.music_info_url);

    let link_checker = LinkChecker::new(timeout);

    let catalog = CatalogService::new(pool.clone(), music_info, link_checker);

    // Build application state
    let state = Arc::new(AppState {
        pool,
        catalog,
        start_time: Instant::now(),
    });

    // Build router
    let app = Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        // Song endpoints
        .route("/song", post(routes::songs::save_song))
        .route(
            "/song/:id",
            patch(routes::songs::update_song).delete(routes::songs::delete_song),
        )
        .route("/song/:id/text", get(routes::songs::get_song_text))
        // Library endpoint
        .route("/library", get(routes::library::get_library))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
