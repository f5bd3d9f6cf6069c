// Library crate for the tic-tac-toe relay server
// This file exposes the public API for integration tests

pub mod app;
pub mod game;
pub mod room;
pub mod session;
pub mod shared;
pub mod timer;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use game::{Board, Marker, Outcome};
pub use room::{models::RoomModel, registry::RoomRegistry};
pub use session::SessionService;
pub use shared::{AppError, AppState};
pub use timer::TurnTimer;
pub use websockets::{
    ConnectionManager, GatewayNotifier, InMemoryConnectionManager, MessageType, RoomNotifier,
    WebSocketMessage, WsReceiveHandler,
};
