use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::game::{Board, Marker};

/// One player attached to a room. The marker is fixed by join order and
/// never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub connection_id: String,
    pub name: String,
    pub marker: Marker,
}

/// Coarse lifecycle state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    WaitingForOpponent,
    InProgress,
    Finished,
}

/// In-memory state of one game session between at most two participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    pub code: String,
    pub participants: Vec<Participant>,
    pub board: Board,
    pub turn_marker: Marker,
    pub phase: RoomPhase,
    /// Connection ids that have asked for a rematch of the current
    /// finished game. Cleared when a new round starts.
    pub rematch_votes: HashSet<String>,
}

impl RoomModel {
    /// Creates a waiting room with the creator as the sole X participant.
    pub fn new(code: String, connection_id: &str, name: &str) -> Self {
        Self {
            code,
            participants: vec![Participant {
                connection_id: connection_id.to_string(),
                name: name.to_string(),
                marker: Marker::X,
            }],
            board: Board::new(),
            turn_marker: Marker::X,
            phase: RoomPhase::WaitingForOpponent,
            rematch_votes: HashSet::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= 2
    }

    pub fn has_connection(&self, connection_id: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.connection_id == connection_id)
    }

    pub fn participant_by_connection(&self, connection_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.connection_id == connection_id)
    }

    /// The other participant, if one has joined.
    pub fn opponent_of(&self, connection_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.connection_id != connection_id)
    }

    /// Display name of the participant holding `marker`.
    pub fn name_of(&self, marker: Marker) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.marker == marker)
            .map(|p| p.name.as_str())
    }

    /// Attaches the second participant as O and starts the game.
    pub fn add_opponent(&mut self, connection_id: &str, name: &str) {
        self.participants.push(Participant {
            connection_id: connection_id.to_string(),
            name: name.to_string(),
            marker: Marker::O,
        });
        self.phase = RoomPhase::InProgress;
    }

    /// Both participants voted: empty board, X to move, votes cleared,
    /// back in progress.
    pub fn reset_for_rematch(&mut self) {
        self.board.clear();
        self.turn_marker = Marker::X;
        self.rematch_votes.clear();
        self.phase = RoomPhase::InProgress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_has_sole_x_participant() {
        let room = RoomModel::new("AB12".to_string(), "conn-1", "owner");
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].marker, Marker::X);
        assert_eq!(room.phase, RoomPhase::WaitingForOpponent);
        assert_eq!(room.turn_marker, Marker::X);
        assert!(!room.is_full());
    }

    #[test]
    fn test_add_opponent_starts_game() {
        let mut room = RoomModel::new("AB12".to_string(), "conn-1", "owner");
        room.add_opponent("conn-2", "guest");

        assert!(room.is_full());
        assert_eq!(room.phase, RoomPhase::InProgress);
        assert_eq!(room.name_of(Marker::X), Some("owner"));
        assert_eq!(room.name_of(Marker::O), Some("guest"));
        assert_eq!(room.opponent_of("conn-1").unwrap().name, "guest");
        assert_eq!(room.opponent_of("conn-2").unwrap().name, "owner");
    }

    #[test]
    fn test_reset_for_rematch() {
        let mut room = RoomModel::new("AB12".to_string(), "conn-1", "owner");
        room.add_opponent("conn-2", "guest");
        room.board.apply_move(0, Marker::X);
        room.turn_marker = Marker::O;
        room.phase = RoomPhase::Finished;
        room.rematch_votes.insert("conn-1".to_string());
        room.rematch_votes.insert("conn-2".to_string());

        room.reset_for_rematch();

        assert_eq!(room.board, Board::new());
        assert_eq!(room.turn_marker, Marker::X);
        assert_eq!(room.phase, RoomPhase::InProgress);
        assert!(room.rematch_votes.is_empty());
    }
}
