//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `type`. Grids are 9x9 arrays of
//! integers where `0` is an empty cell.

use serde::{Deserialize, Serialize};

/// 9x9 grid on the wire.
pub type GridDto = [[u8; 9]; 9];

fn default_ready() -> bool {
    true
}

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom {
        room_id: String,
        display_name: String,
        #[serde(default = "default_ready")]
        ready: bool,
    },
    JoinRoom {
        room_id: String,
    },
    StartRoom {
        room_id: String,
        duration: u32,
    },
    EditCell {
        room_id: String,
        row: usize,
        col: usize,
        value: u8,
    },
    Submit {
        display_name: String,
        room_id: String,
    },
    LeaveRoom {
        /// `None` leaves every room the connection belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
    },
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    InitialBoard {
        grid: GridDto,
    },
    Admin {
        display_name: String,
    },
    UserCountUpdate {
        count: usize,
    },
    AdminStarted {
        ready: bool,
    },
    TimerUpdate {
        remaining: u32,
    },
    GameOver {
        winner: Option<String>,
        message: String,
    },
    Winner {
        display_name: String,
        declared: bool,
        solution: GridDto,
    },
    JoinError {
        message: String,
    },
    BoardUpdate {
        grid: GridDto,
    },
    EditRejected {
        message: String,
    },
    ActionRejected {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_room_defaults_ready_to_true() {
        // テスト項目: ready を省略した create_room は ready=true として扱われる
        // given (前提条件):
        let json = r#"{"type":"create_room","room_id":"1234","display_name":"Alice"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::CreateRoom {
                room_id: "1234".to_string(),
                display_name: "Alice".to_string(),
                ready: true,
            }
        );
    }

    #[test]
    fn test_parse_leave_room_without_room_id() {
        // テスト項目: room_id なしの leave_room を受け付ける
        // given (前提条件):
        let json = r#"{"type":"leave_room"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(msg, ClientMessage::LeaveRoom { room_id: None });
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        // テスト項目: 未知のイベントはパースエラーになる
        // given (前提条件):
        let json = r#"{"type":"send_board","room":"1234"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_game_over_shape() {
        // テスト項目: game_over は winner=null と message を持つ
        // given (前提条件):
        let msg = ServerMessage::GameOver {
            winner: None,
            message: "Time is up!".to_string(),
        };

        // when (操作):
        let json = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "game_over", "winner": null, "message": "Time is up!"})
        );
    }

    #[test]
    fn test_serialize_user_count_update_shape() {
        // テスト項目: user_count_update のフィールド名
        // given (前提条件):
        let msg = ServerMessage::UserCountUpdate { count: 2 };

        // when (操作):
        let json = serde_json::to_string(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"user_count_update","count":2}"#);
    }
}
