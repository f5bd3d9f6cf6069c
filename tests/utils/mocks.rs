use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use noughts::websockets::{MessageType, RoomNotifier, WebSocketMessage};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Where a recorded message was addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Room(String),
    Connection(String),
}

/// RoomNotifier that records every outbound message instead of touching
/// sockets, so scenarios can assert on exactly what was sent and to whom.
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Target, WebSocketMessage)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn room_messages(&self, room_code: &str) -> Vec<WebSocketMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| *target == Target::Room(room_code.to_string()))
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn connection_messages(&self, connection_id: &str) -> Vec<WebSocketMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| *target == Target::Connection(connection_id.to_string()))
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn messages_of_type(&self, message_type: MessageType) -> Vec<WebSocketMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message.message_type == message_type)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl RoomNotifier for RecordingNotifier {
    async fn notify_room(&self, room_code: &str, message: &WebSocketMessage) {
        self.sent
            .lock()
            .unwrap()
            .push((Target::Room(room_code.to_string()), message.clone()));
    }

    async fn notify_connection(&self, connection_id: &str, message: &WebSocketMessage) {
        self.sent
            .lock()
            .unwrap()
            .push((Target::Connection(connection_id.to_string()), message.clone()));
    }
}
