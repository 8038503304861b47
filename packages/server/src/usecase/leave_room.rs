//! UseCase: Room からの退出
//!
//! Room を指定しなければ、その接続が参加している全ての Room から退出する。
//! 残った参加者には新しい人数を配信し、人数が足りなくなったらカウントダウンを止める。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 退出後の user_count_update と、人数不足によるタイマー停止
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人中 1 人が退出して人数 1 が届き、タイマーが止まる
//! - 正常系：Room 指定なしで全ての Room から退出する
//! - エッジケース：参加していない Room からの退出は何もしない

use std::sync::Arc;

use crate::domain::{
    ClientId, DomainError, MessagePusher, Notification, RepositoryError, RoomId, RoomRepository,
};

use super::timer::TimerService;

/// 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    timer: Arc<TimerService>,
    /// カウントダウンを続けるのに必要な最少人数
    min_players: usize,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        timer: Arc<TimerService>,
        min_players: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            timer,
            min_players,
        }
    }

    /// 退出を実行する
    ///
    /// # Returns
    ///
    /// 実際に退出した Room の ID
    pub async fn execute(&self, client_id: &ClientId, room_id: Option<RoomId>) -> Vec<RoomId> {
        let targets = match room_id {
            Some(room_id) => vec![room_id],
            None => self.repository.rooms_of(client_id).await,
        };

        let mut left = Vec::new();
        for room_id in targets {
            if self.leave(client_id, &room_id).await {
                left.push(room_id);
            }
        }
        left
    }

    async fn leave(&self, client_id: &ClientId, room_id: &RoomId) -> bool {
        // 人数の配信が変更と逆順に届かないよう、通知を送り終えるまで保持する
        let _guard = self.repository.lock_room(room_id).await;

        let leaving = client_id.clone();
        let min_players = self.min_players;
        let result = self
            .repository
            .update_room(
                room_id,
                Box::new(move |room, _| room.remove_participant(&leaving, min_players)),
            )
            .await;

        let room = match result {
            Ok(room) => room,
            Err(RepositoryError::RoomNotFound(_))
            | Err(RepositoryError::Domain(DomainError::NotParticipant)) => {
                tracing::debug!("Client '{}' is not in room '{}'", client_id, room_id);
                return false;
            }
            Err(e) => {
                tracing::warn!("Failed to leave room '{}': {}", room_id, e);
                return false;
            }
        };

        let count = room.participant_count();
        tracing::info!(
            "Client '{}' left room '{}' ({} participants remain)",
            client_id,
            room_id,
            count
        );

        if let Err(e) = self
            .message_pusher
            .broadcast(room.participant_ids(), &Notification::UserCountUpdate { count })
            .await
        {
            tracing::warn!("Failed to broadcast user count: {}", e);
        }

        if count < self.min_players && self.timer.stop(room_id).await {
            tracing::info!("Countdown cancelled in room '{}': not enough players", room_id);
        }

        true
    }
}
