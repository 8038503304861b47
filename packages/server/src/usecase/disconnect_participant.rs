//! UseCase: 切断処理
//!
//! 接続が閉じたら MessagePusher から登録を外し、参加中の全ての Room から退出させる。

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, RoomId};

use super::leave_room::LeaveRoomUseCase;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    leave_room: Arc<LeaveRoomUseCase>,
}

impl DisconnectParticipantUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, leave_room: Arc<LeaveRoomUseCase>) -> Self {
        Self {
            message_pusher,
            leave_room,
        }
    }

    /// 切断を実行する
    ///
    /// # Returns
    ///
    /// 退出した Room の ID
    pub async fn execute(&self, client_id: &ClientId) -> Vec<RoomId> {
        // 閉じた接続には送らない
        self.message_pusher.unregister_client(client_id).await;
        let left = self.leave_room.execute(client_id, None).await;
        tracing::info!("Client '{}' disconnected (left {} rooms)", client_id, left.len());
        left
    }
}
