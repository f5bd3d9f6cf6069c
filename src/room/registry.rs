use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

use super::models::{RoomModel, RoomPhase};
use crate::game::{Marker, Outcome};
use crate::shared::AppError;

const ROOM_CODE_LEN: usize = 4;
const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Result of attempting to join a room.
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    /// Second participant attached, game started; returns the updated room.
    Started(RoomModel),
    /// Room is missing, already has two participants, or the connection is
    /// already inside it. The joiner gets one error event either way.
    NotFoundOrFull,
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy)]
pub struct MoveApplied {
    /// Marker that holds the turn after the move.
    pub next_turn: Marker,
    pub outcome: Outcome,
}

/// Result of recording a rematch vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RematchOutcome {
    /// Both participants voted; the room was reset for a new round.
    Restarted,
    /// Vote recorded, waiting on the other participant.
    Waiting,
    /// Vote from a connection outside the room, or the game is not
    /// finished; nothing changed.
    Ignored,
    /// No such room.
    RoomMissing,
}

/// Mapping from room code to live room state.
///
/// Every mutating operation is atomic with respect to the backing store, so
/// no two mutations of the same room ever interleave - the property the
/// session flow and the turn timer both rely on.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    async fn create_room(
        &self,
        connection_id: &str,
        player_name: &str,
    ) -> Result<RoomModel, AppError>;

    async fn try_join(
        &self,
        room_code: &str,
        connection_id: &str,
        player_name: &str,
    ) -> Result<JoinOutcome, AppError>;

    async fn get_room(&self, room_code: &str) -> Result<Option<RoomModel>, AppError>;

    /// Validates and applies a move in one step. `None` means the move was
    /// rejected (absent room, game not in progress, occupied cell, wrong
    /// turn) and nothing changed - the caller stays silent about it.
    async fn apply_move(
        &self,
        room_code: &str,
        index: usize,
        marker: Marker,
    ) -> Result<Option<MoveApplied>, AppError>;

    /// Toggles the turn, but only while the game is in progress and
    /// `expected` still holds the turn. The guard keeps a stale timer
    /// expiry from taking effect after a move or a restart already
    /// advanced the turn.
    async fn skip_turn(
        &self,
        room_code: &str,
        expected: Marker,
    ) -> Result<Option<Marker>, AppError>;

    async fn record_rematch_vote(
        &self,
        room_code: &str,
        connection_id: &str,
    ) -> Result<RematchOutcome, AppError>;

    /// Scans all live rooms for a participant with this connection id.
    /// O(rooms), which is fine at this relay's scale.
    async fn find_by_connection(&self, connection_id: &str) -> Result<Option<String>, AppError>;

    /// Deletes the room and returns its final state. Irreversible; the
    /// caller is responsible for stopping the room's timer.
    async fn remove(&self, room_code: &str) -> Result<Option<RoomModel>, AppError>;
}

/// In-memory implementation backing the live registry.
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Samples 4-character uppercase alphanumeric codes until one is free
    /// among the live rooms.
    fn generate_unique_code(rooms: &HashMap<String, RoomModel>) -> String {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    let idx = rng.random_range(0..ROOM_CODE_CHARSET.len());
                    ROOM_CODE_CHARSET[idx] as char
                })
                .collect();
            if !rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self))]
    async fn create_room(
        &self,
        connection_id: &str,
        player_name: &str,
    ) -> Result<RoomModel, AppError> {
        let mut rooms = self.rooms.lock().unwrap();
        let code = Self::generate_unique_code(&rooms);
        let room = RoomModel::new(code.clone(), connection_id, player_name);
        rooms.insert(code.clone(), room.clone());

        info!(room_code = %code, player_name = %player_name, "Room created");
        Ok(room)
    }

    #[instrument(skip(self))]
    async fn try_join(
        &self,
        room_code: &str,
        connection_id: &str,
        player_name: &str,
    ) -> Result<JoinOutcome, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_code) {
            Some(room) => room,
            None => {
                debug!(room_code = %room_code, "Join failed - room not found");
                return Ok(JoinOutcome::NotFoundOrFull);
            }
        };

        if room.is_full() || room.has_connection(connection_id) {
            debug!(room_code = %room_code, "Join failed - room full");
            return Ok(JoinOutcome::NotFoundOrFull);
        }

        room.add_opponent(connection_id, player_name);

        info!(
            room_code = %room_code,
            player_name = %player_name,
            "Player joined room, game starting"
        );
        Ok(JoinOutcome::Started(room.clone()))
    }

    async fn get_room(&self, room_code: &str) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(room_code).cloned())
    }

    #[instrument(skip(self))]
    async fn apply_move(
        &self,
        room_code: &str,
        index: usize,
        marker: Marker,
    ) -> Result<Option<MoveApplied>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_code) {
            Some(room) => room,
            None => return Ok(None),
        };

        if room.phase != RoomPhase::InProgress
            || !room.board.is_legal_move(index, marker, room.turn_marker)
        {
            debug!(
                room_code = %room_code,
                index = index,
                marker = %marker,
                "Move rejected"
            );
            return Ok(None);
        }

        room.board.apply_move(index, marker);
        room.turn_marker = marker.other();

        let outcome = room.board.evaluate();
        if outcome != Outcome::Ongoing {
            room.phase = RoomPhase::Finished;
        }

        info!(
            room_code = %room_code,
            index = index,
            marker = %marker,
            next_turn = %room.turn_marker,
            "Move applied"
        );
        Ok(Some(MoveApplied {
            next_turn: room.turn_marker,
            outcome,
        }))
    }

    async fn skip_turn(
        &self,
        room_code: &str,
        expected: Marker,
    ) -> Result<Option<Marker>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_code) {
            Some(room) => room,
            None => return Ok(None),
        };

        if room.phase != RoomPhase::InProgress || room.turn_marker != expected {
            debug!(room_code = %room_code, "Stale turn skip ignored");
            return Ok(None);
        }

        room.turn_marker = expected.other();
        info!(
            room_code = %room_code,
            new_turn = %room.turn_marker,
            "Turn skipped on timeout"
        );
        Ok(Some(room.turn_marker))
    }

    #[instrument(skip(self))]
    async fn record_rematch_vote(
        &self,
        room_code: &str,
        connection_id: &str,
    ) -> Result<RematchOutcome, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_code) {
            Some(room) => room,
            None => return Ok(RematchOutcome::RoomMissing),
        };

        if room.phase != RoomPhase::Finished || !room.has_connection(connection_id) {
            return Ok(RematchOutcome::Ignored);
        }

        // A repeated vote from the same connection does not double-count.
        room.rematch_votes.insert(connection_id.to_string());

        let all_voted = room
            .participants
            .iter()
            .all(|p| room.rematch_votes.contains(&p.connection_id));

        if all_voted {
            room.reset_for_rematch();
            info!(room_code = %room_code, "Both players voted, new round starting");
            Ok(RematchOutcome::Restarted)
        } else {
            debug!(room_code = %room_code, "Rematch vote recorded, waiting on opponent");
            Ok(RematchOutcome::Waiting)
        }
    }

    async fn find_by_connection(&self, connection_id: &str) -> Result<Option<String>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms
            .values()
            .find(|room| room.has_connection(connection_id))
            .map(|room| room.code.clone()))
    }

    #[instrument(skip(self))]
    async fn remove(&self, room_code: &str) -> Result<Option<RoomModel>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();
        let removed = rooms.remove(room_code);
        if removed.is_some() {
            info!(room_code = %room_code, "Room removed");
        }
        Ok(removed)
    }
}
