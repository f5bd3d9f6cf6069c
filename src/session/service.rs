use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::game::{Marker, Outcome};
use crate::room::registry::{JoinOutcome, RematchOutcome, RoomRegistry};
use crate::shared::AppError;
use crate::timer::TurnTimer;
use crate::websockets::messages::WebSocketMessage;
use crate::websockets::notifier::RoomNotifier;

/// Error text sent to a client whose join cannot be satisfied.
const JOIN_FAILURE_MESSAGE: &str = "Room is full or does not exist.";

/// Per-room lifecycle driver: waiting -> in progress -> finished, with the
/// rematch cycle back to in progress and unilateral teardown on disconnect.
///
/// The service owns no state of its own - rooms live in the registry,
/// countdowns in the timer - and it talks to clients only through the
/// notifier seam.
pub struct SessionService {
    registry: Arc<dyn RoomRegistry>,
    timer: Arc<TurnTimer>,
    notifier: Arc<dyn RoomNotifier>,
}

impl SessionService {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        timer: Arc<TurnTimer>,
        notifier: Arc<dyn RoomNotifier>,
    ) -> Self {
        Self {
            registry,
            timer,
            notifier,
        }
    }

    /// Registers a new waiting room and confirms it to the creator only.
    #[instrument(skip(self))]
    pub async fn create_room(
        &self,
        connection_id: &str,
        player_name: &str,
    ) -> Result<(), AppError> {
        let room = self.registry.create_room(connection_id, player_name).await?;

        self.notifier
            .notify_connection(
                connection_id,
                &WebSocketMessage::room_created(room.code.clone(), Marker::X),
            )
            .await;

        info!(
            room_code = %room.code,
            player_name = %player_name,
            "Room created, waiting for opponent"
        );
        Ok(())
    }

    /// Attaches the second participant and kicks off the game: both sides
    /// learn the matchup, and the first turn goes on the clock.
    #[instrument(skip(self))]
    pub async fn join_room(
        &self,
        room_code: &str,
        connection_id: &str,
        player_name: &str,
    ) -> Result<(), AppError> {
        match self
            .registry
            .try_join(room_code, connection_id, player_name)
            .await?
        {
            JoinOutcome::Started(room) => {
                let player_x = room.name_of(Marker::X).unwrap_or_default().to_string();
                let player_o = room.name_of(Marker::O).unwrap_or_default().to_string();

                self.notifier
                    .notify_room(room_code, &WebSocketMessage::game_start(player_x, player_o))
                    .await;
                self.timer.start(room_code).await;

                info!(room_code = %room_code, "Game started");
            }
            JoinOutcome::NotFoundOrFull => {
                self.notifier
                    .notify_connection(
                        connection_id,
                        &WebSocketMessage::error(JOIN_FAILURE_MESSAGE.to_string()),
                    )
                    .await;
            }
        }
        Ok(())
    }

    /// Applies a move if it is legal; anything else is dropped without a
    /// reply (stale UI or misbehaving client, not an exceptional case).
    #[instrument(skip(self))]
    pub async fn handle_move(
        &self,
        room_code: &str,
        index: usize,
        marker: Marker,
    ) -> Result<(), AppError> {
        let applied = match self.registry.apply_move(room_code, index, marker).await? {
            Some(applied) => applied,
            None => {
                debug!(room_code = %room_code, index = index, "Illegal move dropped");
                return Ok(());
            }
        };

        self.timer.stop(room_code).await;

        self.notifier
            .notify_room(
                room_code,
                &WebSocketMessage::move_made(index, marker, applied.next_turn),
            )
            .await;

        match applied.outcome {
            Outcome::Ongoing => {
                self.timer.start(room_code).await;
            }
            outcome => {
                // Finished: no countdown for a finished board; the room
                // stays around for a possible rematch.
                self.notifier
                    .notify_room(room_code, &WebSocketMessage::game_over())
                    .await;
                info!(room_code = %room_code, outcome = ?outcome, "Game over");
            }
        }
        Ok(())
    }

    /// Records a rematch vote; once both participants have voted the room
    /// resets and a fresh round starts.
    #[instrument(skip(self))]
    pub async fn handle_rematch(
        &self,
        room_code: &str,
        connection_id: &str,
    ) -> Result<(), AppError> {
        match self
            .registry
            .record_rematch_vote(room_code, connection_id)
            .await?
        {
            RematchOutcome::Restarted => {
                self.notifier
                    .notify_room(room_code, &WebSocketMessage::new_round_started())
                    .await;
                self.timer.start(room_code).await;
                info!(room_code = %room_code, "New round started");
            }
            RematchOutcome::Waiting => {
                self.notifier
                    .notify_room(room_code, &WebSocketMessage::waiting_for_rematch())
                    .await;
            }
            RematchOutcome::Ignored => {
                debug!(room_code = %room_code, "Rematch vote ignored");
            }
            RematchOutcome::RoomMissing => {
                self.notifier
                    .notify_connection(
                        connection_id,
                        &WebSocketMessage::error("Room does not exist.".to_string()),
                    )
                    .await;
            }
        }
        Ok(())
    }

    /// Tears down the departed connection's room. The remaining participant
    /// (if any) is told who left; there is no reconnection path, so the
    /// session ends unilaterally.
    #[instrument(skip(self))]
    pub async fn handle_disconnect(&self, connection_id: &str) -> Result<(), AppError> {
        let room_code = match self.registry.find_by_connection(connection_id).await? {
            Some(room_code) => room_code,
            None => {
                debug!(connection_id = %connection_id, "Disconnect outside any room");
                return Ok(());
            }
        };

        self.timer.stop(&room_code).await;

        let room = match self.registry.remove(&room_code).await? {
            Some(room) => room,
            None => return Ok(()),
        };

        let departed_name = room
            .participant_by_connection(connection_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        if let Some(opponent) = room.opponent_of(connection_id) {
            self.notifier
                .notify_connection(
                    &opponent.connection_id,
                    &WebSocketMessage::opponent_left(departed_name.clone()),
                )
                .await;
        }

        info!(
            room_code = %room_code,
            player_name = %departed_name,
            "Player disconnected, room torn down"
        );
        Ok(())
    }
}
