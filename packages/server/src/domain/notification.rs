//! サーバーからクライアントへ送る通知
//!
//! ユースケースはこの型で通知内容を組み立て、MessagePusher が
//! 具体的なワイヤ形式に変換して送信する。

use super::{grid::Grid, value_object::DisplayName};

/// 時間切れで送る `game_over` のメッセージ
pub const TIME_UP_MESSAGE: &str = "Time is up!";

/// `join_room` で存在しない Room を指定したときのメッセージ
pub const ROOM_NOT_FOUND_MESSAGE: &str = "Room does not exist. Please create a room first.";

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// 参加した接続にだけ送るパズル
    InitialBoard { grid: Grid },
    /// 参加した接続にだけ送る admin の表示名
    Admin { display_name: DisplayName },
    UserCountUpdate { count: usize },
    AdminStarted { ready: bool },
    TimerUpdate { remaining: u32 },
    GameOver { message: String },
    Winner {
        display_name: DisplayName,
        declared: bool,
        solution: Grid,
    },
    JoinError { message: String },
    /// 受理された編集後の盤面
    BoardUpdate { grid: Grid },
    EditRejected { message: String },
    ActionRejected { message: String },
}

impl Notification {
    pub fn time_up() -> Self {
        Self::GameOver {
            message: TIME_UP_MESSAGE.to_string(),
        }
    }

    pub fn room_not_found() -> Self {
        Self::JoinError {
            message: ROOM_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}
