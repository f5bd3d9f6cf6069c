use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noughts::app::build_router;
use noughts::room::registry::{InMemoryRoomRegistry, RoomRegistry};
use noughts::session::SessionService;
use noughts::shared::AppState;
use noughts::timer::TurnTimer;
use noughts::websockets::{
    connection_manager::{ConnectionManager, InMemoryConnectionManager},
    notifier::{GatewayNotifier, RoomNotifier},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noughts=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tic-tac-toe relay server");

    // Wire the dependency graph explicitly; everything behind a trait so
    // tests can stand up their own registries and notifiers in parallel.
    let registry: Arc<dyn RoomRegistry> = Arc::new(InMemoryRoomRegistry::new());
    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    let notifier: Arc<dyn RoomNotifier> = Arc::new(GatewayNotifier::new(
        Arc::clone(&connection_manager),
        Arc::clone(&registry),
    ));
    let turn_timer = Arc::new(TurnTimer::new(
        Arc::clone(&registry),
        Arc::clone(&notifier),
    ));
    let session_service = Arc::new(SessionService::new(
        Arc::clone(&registry),
        turn_timer,
        notifier,
    ));

    let app_state = AppState::new(connection_manager, session_service);

    // Lock CORS to the deployed client origin when one is configured.
    let allowed_origin = std::env::var("ALLOWED_ORIGIN")
        .ok()
        .and_then(|origin| origin.parse().ok());
    let app = build_router(app_state, allowed_origin);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    info!(port = port, "Server listening");
    axum::serve(listener, app).await.unwrap();
}
