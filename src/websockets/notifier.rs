use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::connection_manager::ConnectionManager;
use super::messages::WebSocketMessage;
use crate::room::registry::RoomRegistry;

/// Outbound seam the session state machine and the turn timer talk to.
/// Implementations decide how a room code maps onto actual connections;
/// nothing behind this trait knows about sockets or channels.
#[async_trait]
pub trait RoomNotifier: Send + Sync {
    /// Fan a message out to every participant currently in the room.
    async fn notify_room(&self, room_code: &str, message: &WebSocketMessage);

    /// Point-to-point reply to a single connection.
    async fn notify_connection(&self, connection_id: &str, message: &WebSocketMessage);
}

/// The gateway's notifier: resolves participants through the registry and
/// fans out over the connection manager.
pub struct GatewayNotifier {
    connection_manager: Arc<dyn ConnectionManager>,
    registry: Arc<dyn RoomRegistry>,
}

impl GatewayNotifier {
    pub fn new(
        connection_manager: Arc<dyn ConnectionManager>,
        registry: Arc<dyn RoomRegistry>,
    ) -> Self {
        Self {
            connection_manager,
            registry,
        }
    }

    fn serialize(message: &WebSocketMessage) -> Option<String> {
        match serde_json::to_string(message) {
            Ok(json) => Some(json),
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound message");
                None
            }
        }
    }
}

#[async_trait]
impl RoomNotifier for GatewayNotifier {
    async fn notify_room(&self, room_code: &str, message: &WebSocketMessage) {
        let room = match self.registry.get_room(room_code).await {
            Ok(Some(room)) => room,
            Ok(None) => {
                debug!(room_code = %room_code, "Broadcast to missing room dropped");
                return;
            }
            Err(e) => {
                error!(room_code = %room_code, error = %e, "Registry lookup failed");
                return;
            }
        };

        let Some(json) = Self::serialize(message) else {
            return;
        };

        let connection_ids: Vec<String> = room
            .participants
            .iter()
            .map(|p| p.connection_id.clone())
            .collect();

        self.connection_manager
            .send_to_connections(&connection_ids, &json)
            .await;
    }

    async fn notify_connection(&self, connection_id: &str, message: &WebSocketMessage) {
        let Some(json) = Self::serialize(message) else {
            return;
        };
        self.connection_manager
            .send_to_connection(connection_id, &json)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::registry::InMemoryRoomRegistry;
    use crate::websockets::connection_manager::InMemoryConnectionManager;
    use crate::websockets::messages::MessageType;
    use tokio::sync::mpsc;

    async fn recv_message(
        rx: &mut mpsc::UnboundedReceiver<String>,
    ) -> crate::websockets::messages::WebSocketMessage {
        serde_json::from_str(&rx.recv().await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_notify_room_reaches_both_participants() {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let manager = Arc::new(InMemoryConnectionManager::new());
        let notifier = GatewayNotifier::new(manager.clone(), registry.clone());

        let (tx_1, mut rx_1) = mpsc::unbounded_channel();
        let (tx_2, mut rx_2) = mpsc::unbounded_channel();
        manager.add_connection("conn-1".to_string(), tx_1).await;
        manager.add_connection("conn-2".to_string(), tx_2).await;

        let room = registry.create_room("conn-1", "owner").await.unwrap();
        registry
            .try_join(&room.code, "conn-2", "guest")
            .await
            .unwrap();

        notifier
            .notify_room(&room.code, &WebSocketMessage::game_over())
            .await;

        assert!(matches!(
            recv_message(&mut rx_1).await.message_type,
            MessageType::GameOver
        ));
        assert!(matches!(
            recv_message(&mut rx_2).await.message_type,
            MessageType::GameOver
        ));
    }

    #[tokio::test]
    async fn test_notify_connection_is_point_to_point() {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let manager = Arc::new(InMemoryConnectionManager::new());
        let notifier = GatewayNotifier::new(manager.clone(), registry);

        let (tx_1, mut rx_1) = mpsc::unbounded_channel();
        let (tx_2, mut rx_2) = mpsc::unbounded_channel();
        manager.add_connection("conn-1".to_string(), tx_1).await;
        manager.add_connection("conn-2".to_string(), tx_2).await;

        notifier
            .notify_connection("conn-1", &WebSocketMessage::error("nope".to_string()))
            .await;

        assert!(matches!(
            recv_message(&mut rx_1).await.message_type,
            MessageType::Error
        ));
        assert!(rx_2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_notify_missing_room_is_dropped() {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let manager = Arc::new(InMemoryConnectionManager::new());
        let notifier = GatewayNotifier::new(manager, registry);

        // Should not panic or send anything
        notifier
            .notify_room("ZZZZ", &WebSocketMessage::game_over())
            .await;
    }
}
