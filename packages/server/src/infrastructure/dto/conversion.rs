//! Conversion logic between DTOs and domain types.

use masu_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{Notification, Participant, Room};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain → DTO
// ========================================

impl From<&Notification> for dto::ServerMessage {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::InitialBoard { grid } => Self::InitialBoard {
                grid: grid.into_rows(),
            },
            Notification::Admin { display_name } => Self::Admin {
                display_name: display_name.as_str().to_string(),
            },
            Notification::UserCountUpdate { count } => Self::UserCountUpdate { count: *count },
            Notification::AdminStarted { ready } => Self::AdminStarted { ready: *ready },
            Notification::TimerUpdate { remaining } => Self::TimerUpdate {
                remaining: *remaining,
            },
            Notification::GameOver { message } => Self::GameOver {
                winner: None,
                message: message.clone(),
            },
            Notification::Winner {
                display_name,
                declared,
                solution,
            } => Self::Winner {
                display_name: display_name.as_str().to_string(),
                declared: *declared,
                solution: solution.into_rows(),
            },
            Notification::JoinError { message } => Self::JoinError {
                message: message.clone(),
            },
            Notification::BoardUpdate { grid } => Self::BoardUpdate {
                grid: grid.into_rows(),
            },
            Notification::EditRejected { message } => Self::EditRejected {
                message: message.clone(),
            },
            Notification::ActionRejected { message } => Self::ActionRejected {
                message: message.clone(),
            },
        }
    }
}

impl From<&Participant> for http::ParticipantDetailDto {
    fn from(participant: &Participant) -> Self {
        Self {
            client_id: participant.id.as_str().to_string(),
            joined_at: timestamp_to_jst_rfc3339(participant.joined_at.value()),
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participant_count: room.participant_count(),
            phase: room.phase.as_str().to_string(),
            admin: room.admin_name.as_str().to_string(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            last_activity: timestamp_to_jst_rfc3339(room.last_activity.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            phase: room.phase.as_str().to_string(),
            admin: room.admin_name.as_str().to_string(),
            ready: room.ready,
            countdown_remaining: room.countdown,
            winner_declared: room.winner_declared,
            empty_cells: room.board.empty_cells(),
            participants: room.participants.iter().map(Into::into).collect(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            last_activity: timestamp_to_jst_rfc3339(room.last_activity.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DisplayName, Grid, Timestamp,
        entity::tests::{client, sample_room},
        grid::tests::SOLVED,
    };

    #[test]
    fn test_winner_notification_to_dto() {
        // テスト項目: Winner 通知が表示名・フラグ・解答を含む DTO に変換される
        // given (前提条件):
        let notification = Notification::Winner {
            display_name: DisplayName::new("Bob".to_string()).unwrap(),
            declared: true,
            solution: Grid::from_rows(SOLVED).unwrap(),
        };

        // when (操作):
        let dto_msg = dto::ServerMessage::from(&notification);

        // then (期待する結果):
        assert_eq!(
            dto_msg,
            dto::ServerMessage::Winner {
                display_name: "Bob".to_string(),
                declared: true,
                solution: SOLVED,
            }
        );
    }

    #[test]
    fn test_time_up_notification_to_dto() {
        // テスト項目: 時間切れの通知は winner なしの game_over になる
        // given (前提条件):
        let notification = Notification::time_up();

        // when (操作):
        let dto_msg = dto::ServerMessage::from(&notification);

        // then (期待する結果):
        assert_eq!(
            dto_msg,
            dto::ServerMessage::GameOver {
                winner: None,
                message: "Time is up!".to_string(),
            }
        );
    }

    #[test]
    fn test_room_to_detail_dto() {
        // テスト項目: Room が詳細 DTO に変換され、解答は含まれない
        // given (前提条件):
        let mut room = sample_room(true);
        room.toggle_ready(&client("alice"), 300).unwrap();

        // when (操作):
        let detail = http::RoomDetailDto::from(&room);

        // then (期待する結果):
        assert_eq!(detail.id, "1234");
        assert_eq!(detail.phase, "active");
        assert_eq!(detail.admin, "Alice");
        assert!(!detail.ready);
        assert_eq!(detail.countdown_remaining, Some(300));
        assert_eq!(detail.empty_cells, 4);
        assert_eq!(detail.participants.len(), 1);
        assert_eq!(detail.participants[0].client_id, "alice");
        assert!(detail.created_at.ends_with("+09:00"));
    }

    #[test]
    fn test_room_to_summary_dto() {
        // テスト項目: Room が一覧用の DTO に変換される
        // given (前提条件):
        let mut room = sample_room(true);
        room.touch(Timestamp::new(1672498800000));

        // when (操作):
        let summary = http::RoomSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(summary.id, "1234");
        assert_eq!(summary.participant_count, 1);
        assert_eq!(summary.phase, "lobby");
        assert!(summary.last_activity.starts_with("2023-01-01T00:00:00"));
    }
}
