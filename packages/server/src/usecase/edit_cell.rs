//! UseCase: セル編集
//!
//! 編集は盤面ルールで検証してから記録し、編集者を含む全ての参加者に最新の盤面を配信する。
//! 編集者にとってはこの board_update が受理の確認になる。
//! 拒否された編集は編集者にだけ edit_rejected で通知し、続けて現在の盤面を送り直す。
//! 盤面は変わらない。
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効な配置が編集者を含む全員に board_update として届く
//! - 異常系：行の重複、given セルの上書き、開始前の非 admin の編集
//! - 異常系：拒否された編集者には edit_rejected の後に現在の盤面が届く
//! - エッジケース：セルを空に戻す編集

use std::sync::Arc;

use crate::domain::{
    ClientId, MessagePusher, Notification, RepositoryError, RoomId, RoomRepository,
};

use super::error::EditCellError;

/// セル編集のユースケース
pub struct EditCellUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl EditCellUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        client_id: &ClientId,
        room_id: &RoomId,
        row: usize,
        col: usize,
        value: u8,
    ) -> Result<(), EditCellError> {
        // board_update が記録の順に届くよう、配信し終えるまで保持する
        let _guard = self.repository.lock_room(room_id).await;

        let editor = client_id.clone();
        let result = self
            .repository
            .update_room(
                room_id,
                Box::new(move |room, _| room.apply_edit(&editor, row, col, value)),
            )
            .await;

        let room = match result {
            Ok(room) => room,
            Err(RepositoryError::Domain(e)) => {
                tracing::debug!("Edit by '{}' rejected: {}", client_id, e);
                self.push(
                    client_id,
                    &Notification::EditRejected {
                        message: e.to_string(),
                    },
                )
                .await;
                // 編集者の盤面には拒否された値が残っているので、記録済みの盤面で上書きさせる
                if let Ok(room) = self.repository.get_room(room_id).await
                    && room.contains(client_id)
                {
                    self.push(client_id, &Notification::BoardUpdate { grid: room.board })
                        .await;
                }
                return Err(EditCellError::Rejected(e));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self
            .message_pusher
            .broadcast(
                room.participant_ids(),
                &Notification::BoardUpdate { grid: room.board },
            )
            .await
        {
            tracing::warn!("Failed to broadcast board update: {}", e);
        }

        Ok(())
    }

    async fn push(&self, client_id: &ClientId, notification: &Notification) {
        if let Err(e) = self.message_pusher.push_to(client_id, notification).await {
            tracing::warn!("Failed to push to '{}': {}", client_id, e);
        }
    }
}
