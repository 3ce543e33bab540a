//! Moondust server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use moondust_bot::dispatcher::Dispatcher;
use moondust_bot::error::AppError;
use moondust_bot::notify::LoggingNotifier;
use moondust_bot::routes;
use moondust_bot::state::AppState;
use moondust_core::clock::SystemClock;
use moondust_core::model::{ActorId, ModeratorId};
use moondust_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Moondust server");

    // Read configuration from environment.
    let moderator: i64 = std::env::var("MODERATOR_ID")
        .map_err(|_| AppError::Config("MODERATOR_ID environment variable must be set".into()))?
        .parse()
        .map_err(|e| AppError::Config(format!("MODERATOR_ID must be a valid i64: {e}")))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Wire the dispatcher from its collaborators.
    let store = Arc::new(MemoryStore::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(SystemClock),
        store.clone(),
        store.clone(),
        store,
        Arc::new(LoggingNotifier),
        ModeratorId(ActorId(moderator)),
    ));
    let app_state = AppState::new(dispatcher);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
