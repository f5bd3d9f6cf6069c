use std::sync::Arc;

use noughts::room::registry::InMemoryRoomRegistry;
use noughts::websockets::messages::RoomCreatedPayload;
use noughts::websockets::MessageType;
use noughts::{RoomRegistry, SessionService, TurnTimer};

use super::mocks::RecordingNotifier;

pub const OWNER_CONN: &str = "conn-owner";
pub const GUEST_CONN: &str = "conn-guest";

/// A session state machine wired to a real registry and timer, with the
/// notifier mocked out for assertions.
pub struct TestSetup {
    pub registry: Arc<InMemoryRoomRegistry>,
    pub notifier: Arc<RecordingNotifier>,
    pub session: SessionService,
}

impl TestSetup {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let notifier = RecordingNotifier::new();

        let dyn_registry: Arc<dyn RoomRegistry> = registry.clone();
        let timer = Arc::new(TurnTimer::new(dyn_registry.clone(), notifier.clone()));
        let session = SessionService::new(dyn_registry, timer, notifier.clone());

        Self {
            registry,
            notifier,
            session,
        }
    }

    /// Creates a room as "owner" and returns its code, read back from the
    /// ROOM_CREATED confirmation.
    pub async fn create_room(&self) -> String {
        self.session
            .create_room(OWNER_CONN, "owner")
            .await
            .expect("create_room should succeed");

        let created = self.notifier.messages_of_type(MessageType::RoomCreated);
        let payload: RoomCreatedPayload =
            serde_json::from_value(created.last().expect("ROOM_CREATED sent").payload.clone())
                .expect("valid ROOM_CREATED payload");
        payload.room_code
    }

    /// Creates a room and joins it as "guest", returning the room code of
    /// the now-running game.
    pub async fn start_game(&self) -> String {
        let room_code = self.create_room().await;
        self.session
            .join_room(&room_code, GUEST_CONN, "guest")
            .await
            .expect("join_room should succeed");
        room_code
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}
