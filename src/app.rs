use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::websockets::handler::websocket_handler;

/// Static availability message for the health check.
const HEALTH_MESSAGE: &str = "Server is running and ready for connections!";

/// Builds the application router: a plain health check at `/` and the
/// WebSocket gateway at `/ws`. With no configured origin, CORS stays
/// permissive (local development); in production the client origin comes
/// from the environment.
pub fn build_router(app_state: AppState, allowed_origin: Option<HeaderValue>) -> Router {
    let cors = match allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST]),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/", get(health_check))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}
