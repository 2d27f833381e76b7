//! RaceTime - Application Entry Point
//!
//! This is the main entry point for the RaceTime server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, middleware};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use racetime::{
    config::CONFIG,
    constants::API_BASE_PATH,
    db::{self, PgStore},
    handlers,
    middleware::logging_middleware,
    state::AppState,
    timing::{LogNotifier, Notifier, TimingEngine, TimingStores},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RaceTime server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Build the timing engine over the database
    let stores = TimingStores::from_shared(Arc::new(PgStore::new(db_pool.clone())));
    let notifier = CONFIG.timing.notifications_enabled.then(|| {
        Arc::new(LogNotifier::new(CONFIG.timing.age_brackets.clone())) as Arc<dyn Notifier>
    });
    let engine = TimingEngine::new(stores, &CONFIG.timing, notifier);

    let brackets: Vec<String> = CONFIG.timing.age_brackets.iter().map(|b| b.label()).collect();
    tracing::info!(
        age_brackets = %brackets.join(","),
        leaderboard_default_limit = CONFIG.timing.leaderboard_default_limit,
        notifications = CONFIG.timing.notifications_enabled,
        "Timing engine ready"
    );

    // Create application state
    let state = AppState::new(db_pool, engine, CONFIG.clone());

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            CONFIG.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
