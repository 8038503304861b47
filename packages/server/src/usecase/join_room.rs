//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者への通知（admin / user_count_update / initial_board）の内容と順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存の Room に参加する
//! - 正常系：途中参加で最新の盤面とゲーム状態を受け取る
//! - 異常系：存在しない Room への参加は join_error になり、Room は作られない
//! - エッジケース：同じ Room への二重参加
//! - 並行性：同時に参加しても、各参加者が最後に受け取る人数は Room の人数と一致する

use std::sync::Arc;

use crate::domain::{
    ClientId, MessagePusher, Notification, Participant, RepositoryError, Room, RoomId,
    RoomPhase, RoomRepository,
};

use super::error::JoinRoomError;

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Room に参加し、参加者に現在の状態を送る
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加後の参加人数
    /// * `Err(JoinRoomError)` - Room が存在しない等
    pub async fn execute(
        &self,
        client_id: &ClientId,
        room_id: &RoomId,
    ) -> Result<usize, JoinRoomError> {
        // 人数の配信が変更と逆順に届かないよう、通知を送り終えるまで保持する
        let _guard = self.repository.lock_room(room_id).await;

        let joining = client_id.clone();
        let result = self
            .repository
            .update_room(
                room_id,
                Box::new(move |room, now| {
                    room.add_participant(Participant::new(joining, now));
                    Ok(())
                }),
            )
            .await;

        let room = match result {
            Ok(room) => room,
            Err(RepositoryError::RoomNotFound(id)) => {
                tracing::info!("Client '{}' tried to join missing room '{}'", client_id, id);
                self.push(client_id, &Notification::room_not_found()).await;
                return Err(JoinRoomError::RoomNotFound(id));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "Client '{}' joined room '{}' ({} participants)",
            client_id,
            room_id,
            room.participant_count()
        );
        self.announce(client_id, &room).await;
        Ok(room.participant_count())
    }

    /// 参加直後の通知: admin → user_count_update（Room 全体）→ initial_board → 最新盤面
    async fn announce(&self, client_id: &ClientId, room: &Room) {
        self.push(
            client_id,
            &Notification::Admin {
                display_name: room.admin_name.clone(),
            },
        )
        .await;

        if let Err(e) = self
            .message_pusher
            .broadcast(
                room.participant_ids(),
                &Notification::UserCountUpdate {
                    count: room.participant_count(),
                },
            )
            .await
        {
            tracing::warn!("Failed to broadcast user count: {}", e);
        }

        self.push(client_id, &Notification::InitialBoard { grid: room.puzzle })
            .await;

        if room.board != room.puzzle {
            self.push(client_id, &Notification::BoardUpdate { grid: room.board })
                .await;
        }

        // 途中参加者にはゲームが始まっていることを伝える
        if room.phase != RoomPhase::Lobby {
            self.push(client_id, &Notification::AdminStarted { ready: room.ready })
                .await;
        }
    }

    async fn push(&self, client_id: &ClientId, notification: &Notification) {
        if let Err(e) = self.message_pusher.push_to(client_id, notification).await {
            tracing::warn!("Failed to push to '{}': {}", client_id, e);
        }
    }
}
