//! UseCase: 接続処理
//!
//! WebSocket 接続ごとに ClientId を払い出し、送信チャンネルを MessagePusher に登録する。
//! 接続しただけではどの Room にも属さない。

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, PusherChannel};

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 新しい ClientId を払い出して送信チャンネルを登録する
    pub async fn execute(&self, sender: PusherChannel) -> ClientId {
        let client_id = ClientId::generate();
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await;
        tracing::info!("Client '{}' connected", client_id);
        client_id
    }
}
