//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（通知）のインターフェース。
//! ワイヤーフォーマットへの変換は実装側（Infrastructure 層）が担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, StageEvent};

/// クライアントへの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &StageEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &StageEvent,
    ) -> Result<(), MessagePushError>;
}
