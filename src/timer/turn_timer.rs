use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::game::Marker;
use crate::room::models::RoomPhase;
use crate::room::registry::RoomRegistry;
use crate::websockets::messages::WebSocketMessage;
use crate::websockets::notifier::RoomNotifier;

/// Seconds a player gets per turn.
pub const DEFAULT_TURN_SECONDS: u32 = 30;

/// Per-room turn countdown.
///
/// Each room holds at most one live countdown task; starting a new one
/// implicitly aborts the previous. The countdown broadcasts one tick per
/// second and, on hitting zero, skips the idle player's turn through the
/// registry and keeps going for the next player - an unbounded auto-skip
/// loop until the game ends or the room is torn down.
pub struct TurnTimer {
    registry: Arc<dyn RoomRegistry>,
    notifier: Arc<dyn RoomNotifier>,
    turn_seconds: u32,
    countdowns: RwLock<HashMap<String, JoinHandle<()>>>,
}

impl TurnTimer {
    pub fn new(registry: Arc<dyn RoomRegistry>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            registry,
            notifier,
            turn_seconds: DEFAULT_TURN_SECONDS,
            countdowns: RwLock::new(HashMap::new()),
        }
    }

    /// Starts (or restarts) the countdown for a room. No-op unless the room
    /// has both participants and a game in progress.
    pub async fn start(&self, room_code: &str) {
        let room = match self.registry.get_room(room_code).await {
            Ok(Some(room)) => room,
            _ => {
                debug!(room_code = %room_code, "Timer start skipped - room missing");
                return;
            }
        };
        if !room.is_full() || room.phase != RoomPhase::InProgress {
            debug!(room_code = %room_code, "Timer start skipped - game not running");
            return;
        }

        let mut countdowns = self.countdowns.write().await;
        if let Some(previous) = countdowns.remove(room_code) {
            previous.abort();
        }

        info!(
            room_code = %room_code,
            turn = %room.turn_marker,
            seconds = self.turn_seconds,
            "Turn countdown started"
        );

        let handle = tokio::spawn(run_countdown(
            room_code.to_string(),
            room.turn_marker,
            self.turn_seconds,
            Arc::clone(&self.registry),
            Arc::clone(&self.notifier),
        ));
        countdowns.insert(room_code.to_string(), handle);
    }

    /// Aborts the room's countdown, if any. Idempotent; an aborted task can
    /// never deliver another tick or skip.
    pub async fn stop(&self, room_code: &str) {
        let mut countdowns = self.countdowns.write().await;
        if let Some(handle) = countdowns.remove(room_code) {
            handle.abort();
            debug!(room_code = %room_code, "Turn countdown stopped");
        }
    }
}

/// The countdown loop. `awaiting` is the marker whose turn is being timed;
/// the skip at zero is guarded on it, so an expiry that raced a move (or a
/// room teardown) is a no-op and ends the task.
async fn run_countdown(
    room_code: String,
    mut awaiting: Marker,
    turn_seconds: u32,
    registry: Arc<dyn RoomRegistry>,
    notifier: Arc<dyn RoomNotifier>,
) {
    let mut remaining = turn_seconds;
    loop {
        notifier
            .notify_room(&room_code, &WebSocketMessage::timer_tick(remaining))
            .await;

        tokio::time::sleep(Duration::from_secs(1)).await;
        remaining -= 1;

        if remaining == 0 {
            match registry.skip_turn(&room_code, awaiting).await {
                Ok(Some(next_marker)) => {
                    notifier
                        .notify_room(&room_code, &WebSocketMessage::turn_skipped(next_marker))
                        .await;
                    awaiting = next_marker;
                    remaining = turn_seconds;
                }
                _ => break, // room gone, game over, or turn already advanced
            }
        }
    }
}
