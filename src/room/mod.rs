pub mod models;
pub mod registry;

pub use models::{Participant, RoomModel, RoomPhase};
pub use registry::{InMemoryRoomRegistry, JoinOutcome, MoveApplied, RematchOutcome, RoomRegistry};
