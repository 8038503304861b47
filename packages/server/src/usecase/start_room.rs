//! UseCase: ゲーム開始（ready フラグの切り替え）
//!
//! admin だけが実行できる。`ready` が `false` になったらカウントダウンを開始し、
//! `true` に戻ったら止める。
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：admin の開始で admin_started(false) が全員に届き、タイマーが動く
//! - 正常系：もう一度切り替えると admin_started(true) でタイマーが止まる
//! - 異常系：admin 以外の開始要求は拒否され、状態は変わらない

use std::sync::Arc;

use crate::domain::{
    ClientId, DomainError, MessagePusher, Notification, RepositoryError, RoomId, RoomRepository,
};

use super::{error::StartRoomError, timer::TimerService};

/// ゲーム開始のユースケース
pub struct StartRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    timer: Arc<TimerService>,
}

impl StartRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        timer: Arc<TimerService>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            timer,
        }
    }

    /// ready フラグを切り替える
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - 切り替え後の ready
    pub async fn execute(
        &self,
        client_id: &ClientId,
        room_id: &RoomId,
        duration: u32,
    ) -> Result<bool, StartRoomError> {
        // admin_started とタイマーの開始・停止を切り替えの順に揃える
        let _guard = self.repository.lock_room(room_id).await;

        let requester = client_id.clone();
        let result = self
            .repository
            .update_room(
                room_id,
                Box::new(move |room, _| room.toggle_ready(&requester, duration).map(|_| ())),
            )
            .await;

        let room = match result {
            Ok(room) => room,
            Err(RepositoryError::Domain(e @ DomainError::NotAdmin)) => {
                tracing::info!("Client '{}' is not the admin of room '{}'", client_id, room_id);
                let rejection = Notification::ActionRejected {
                    message: e.to_string(),
                };
                if let Err(e) = self.message_pusher.push_to(client_id, &rejection).await {
                    tracing::warn!("Failed to push rejection: {}", e);
                }
                return Err(StartRoomError::Rejected(e));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self
            .message_pusher
            .broadcast(
                room.participant_ids(),
                &Notification::AdminStarted { ready: room.ready },
            )
            .await
        {
            tracing::warn!("Failed to broadcast admin_started: {}", e);
        }

        if room.ready {
            self.timer.stop(room_id).await;
        } else {
            tracing::info!("Game started in room '{}' ({} seconds)", room_id, duration);
            self.timer.start(room_id.clone()).await;
        }

        Ok(room.ready)
    }
}
