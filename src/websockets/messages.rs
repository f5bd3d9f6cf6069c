use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::Marker;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    CreateRoom,
    JoinRoom,
    MakeMove,
    RequestRematch,

    // Server -> Client
    RoomCreated,
    GameStart,
    MoveMade,
    TimerTick,
    TurnSkipped,
    GameOver,
    WaitingForRematch,
    NewRoundStarted,
    OpponentLeft,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomPayload {
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_code: String,
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeMovePayload {
    pub room_code: String,
    pub index: usize,
    pub player_marker: Marker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRematchPayload {
    pub room_code: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreatedPayload {
    pub room_code: String,
    pub player_marker: Marker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartPayload {
    pub player_x: String,
    pub player_o: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveMadePayload {
    pub index: usize,
    pub player_marker: Marker,
    pub next_turn: Marker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerTickPayload {
    pub seconds_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSkippedPayload {
    pub new_turn_marker: Marker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverPayload {
    // Empty payload - clients already hold the final board
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingForRematchPayload {
    // Empty payload - signals one vote is in
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoundStartedPayload {
    // Empty payload - board resets to empty, X to move
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentLeftPayload {
    pub disconnected_player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create a ROOM_CREATED message
    pub fn room_created(room_code: String, player_marker: Marker) -> Self {
        let payload = RoomCreatedPayload {
            room_code,
            player_marker,
        };
        Self::new(
            MessageType::RoomCreated,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a GAME_START message
    pub fn game_start(player_x: String, player_o: String) -> Self {
        let payload = GameStartPayload { player_x, player_o };
        Self::new(
            MessageType::GameStart,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a MOVE_MADE message
    pub fn move_made(index: usize, player_marker: Marker, next_turn: Marker) -> Self {
        let payload = MoveMadePayload {
            index,
            player_marker,
            next_turn,
        };
        Self::new(
            MessageType::MoveMade,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a TIMER_TICK message
    pub fn timer_tick(seconds_remaining: u32) -> Self {
        let payload = TimerTickPayload { seconds_remaining };
        Self::new(
            MessageType::TimerTick,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a TURN_SKIPPED message
    pub fn turn_skipped(new_turn_marker: Marker) -> Self {
        let payload = TurnSkippedPayload { new_turn_marker };
        Self::new(
            MessageType::TurnSkipped,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a GAME_OVER message
    pub fn game_over() -> Self {
        let payload = GameOverPayload {};
        Self::new(
            MessageType::GameOver,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a WAITING_FOR_REMATCH message
    pub fn waiting_for_rematch() -> Self {
        let payload = WaitingForRematchPayload {};
        Self::new(
            MessageType::WaitingForRematch,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a NEW_ROUND_STARTED message
    pub fn new_round_started() -> Self {
        let payload = NewRoundStartedPayload {};
        Self::new(
            MessageType::NewRoundStarted,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an OPPONENT_LEFT message
    pub fn opponent_left(disconnected_player_name: String) -> Self {
        let payload = OpponentLeftPayload {
            disconnected_player_name,
        };
        Self::new(
            MessageType::OpponentLeft,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an ERROR message
    pub fn error(message: String) -> Self {
        let payload = ErrorPayload { message };
        Self::new(MessageType::Error, serde_json::to_value(payload).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors_and_serialization() {
        // room_created
        let rc = WebSocketMessage::room_created("AB12".to_string(), Marker::X);
        assert!(matches!(rc.message_type, MessageType::RoomCreated));
        let s = serde_json::to_string(&rc).unwrap();
        assert!(s.contains("\"ROOM_CREATED\""));
        let back: WebSocketMessage = serde_json::from_str(&s).unwrap();
        assert!(matches!(back.message_type, MessageType::RoomCreated));
        let payload: RoomCreatedPayload = serde_json::from_value(back.payload).unwrap();
        assert_eq!(payload.room_code, "AB12");
        assert_eq!(payload.player_marker, Marker::X);

        // game_start
        let gs = WebSocketMessage::game_start("owner".to_string(), "guest".to_string());
        assert!(matches!(gs.message_type, MessageType::GameStart));

        // move_made
        let mm = WebSocketMessage::move_made(4, Marker::X, Marker::O);
        assert!(matches!(mm.message_type, MessageType::MoveMade));
        let payload: MoveMadePayload = serde_json::from_value(mm.payload).unwrap();
        assert_eq!(payload.next_turn, Marker::O);

        // timer_tick
        let tt = WebSocketMessage::timer_tick(30);
        assert!(matches!(tt.message_type, MessageType::TimerTick));

        // turn_skipped
        let ts = WebSocketMessage::turn_skipped(Marker::O);
        assert!(matches!(ts.message_type, MessageType::TurnSkipped));

        // game_over
        let go = WebSocketMessage::game_over();
        assert!(matches!(go.message_type, MessageType::GameOver));

        // waiting_for_rematch
        let wr = WebSocketMessage::waiting_for_rematch();
        assert!(matches!(wr.message_type, MessageType::WaitingForRematch));

        // new_round_started
        let nr = WebSocketMessage::new_round_started();
        assert!(matches!(nr.message_type, MessageType::NewRoundStarted));

        // opponent_left
        let ol = WebSocketMessage::opponent_left("guest".to_string());
        assert!(matches!(ol.message_type, MessageType::OpponentLeft));

        // error
        let e = WebSocketMessage::error("oops".to_string());
        assert!(matches!(e.message_type, MessageType::Error));
    }

    #[test]
    fn test_inbound_payloads_deserialize() {
        let raw = r#"{
            "type": "MAKE_MOVE",
            "payload": { "room_code": "AB12", "index": 4, "player_marker": "X" },
            "meta": null
        }"#;
        let message: WebSocketMessage = serde_json::from_str(raw).unwrap();
        assert!(matches!(message.message_type, MessageType::MakeMove));
        let payload: MakeMovePayload = serde_json::from_value(message.payload).unwrap();
        assert_eq!(payload.index, 4);
        assert_eq!(payload.player_marker, Marker::X);
    }
}
