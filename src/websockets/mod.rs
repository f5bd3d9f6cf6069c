// Connection gateway: socket plumbing, wire protocol, and outbound fan-out.

pub mod connection_manager;
pub mod handler;
pub mod messages;
pub mod notifier;
pub mod socket;

pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, WsReceiveHandler};
pub use messages::{MessageType, WebSocketMessage};
pub use notifier::{GatewayNotifier, RoomNotifier};
pub use socket::{Connection, MessageHandler, SocketWrapper};
