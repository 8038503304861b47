//! MessagePusher trait 定義
//!
//! クライアントへの通知手段の抽象化。UseCase 層はこの trait にだけ依存し、
//! WebSocket などの具体的な送信方法は Infrastructure 層が提供する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, MessagePushError, Notification};

/// 接続ごとの送信チャンネル（シリアライズ済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// クライアントの登録を解除
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントに通知
    async fn push_to(
        &self,
        client_id: &ClientId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに通知。一部の送信失敗は許容する
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
