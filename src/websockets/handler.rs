use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::session::SessionService;
use crate::shared::AppState;
use crate::websockets::messages::{
    CreateRoomPayload, JoinRoomPayload, MakeMovePayload, MessageType, RequestRematchPayload,
    WebSocketMessage,
};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client.
/// Translates inbound protocol events into session state machine calls.
pub struct WsReceiveHandler {
    session_service: Arc<SessionService>,
}

impl WsReceiveHandler {
    pub fn new(session_service: Arc<SessionService>) -> Self {
        Self { session_service }
    }
}

#[async_trait]
impl MessageHandler for WsReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let result = match ws_message.message_type {
            MessageType::CreateRoom => {
                match serde_json::from_value::<CreateRoomPayload>(ws_message.payload) {
                    Ok(payload) => {
                        self.session_service
                            .create_room(connection_id, &payload.player_name)
                            .await
                    }
                    Err(e) => {
                        warn!(connection_id = %connection_id, error = %e, "Malformed CREATE_ROOM payload");
                        return;
                    }
                }
            }
            MessageType::JoinRoom => {
                match serde_json::from_value::<JoinRoomPayload>(ws_message.payload) {
                    Ok(payload) => {
                        self.session_service
                            .join_room(&payload.room_code, connection_id, &payload.player_name)
                            .await
                    }
                    Err(e) => {
                        warn!(connection_id = %connection_id, error = %e, "Malformed JOIN_ROOM payload");
                        return;
                    }
                }
            }
            MessageType::MakeMove => {
                match serde_json::from_value::<MakeMovePayload>(ws_message.payload) {
                    Ok(payload) => {
                        self.session_service
                            .handle_move(&payload.room_code, payload.index, payload.player_marker)
                            .await
                    }
                    Err(e) => {
                        warn!(connection_id = %connection_id, error = %e, "Malformed MAKE_MOVE payload");
                        return;
                    }
                }
            }
            MessageType::RequestRematch => {
                match serde_json::from_value::<RequestRematchPayload>(ws_message.payload) {
                    Ok(payload) => {
                        self.session_service
                            .handle_rematch(&payload.room_code, connection_id)
                            .await
                    }
                    Err(e) => {
                        warn!(connection_id = %connection_id, error = %e, "Malformed REQUEST_REMATCH payload");
                        return;
                    }
                }
            }
            _ => {
                debug!(
                    message_type = ?ws_message.message_type,
                    "Unhandled message type"
                );
                return;
            }
        };

        if let Err(e) = result {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "Session operation failed"
            );
        }
    }
}

/// WebSocket endpoint: GET /ws. Each accepted connection gets a fresh
/// server-assigned identity; rooms are created and joined over the socket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = uuid::Uuid::new_v4().to_string();

    info!(
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WsReceiveHandler::new(app_state.session_service.clone()));

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                connection_id = %connection_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: deregister the connection, then let the session state
    // machine tear down whatever room it was part of.
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    if let Err(e) = app_state
        .session_service
        .handle_disconnect(&connection_id)
        .await
    {
        warn!(
            connection_id = %connection_id,
            error = %e,
            "Disconnect cleanup failed"
        );
    }
}
