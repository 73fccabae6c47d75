//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`UnboundedSender`）を管理
//! - `StageEvent` を JSON テキストフレームにエンコードして送信
//!
//! ## 設計ノート
//!
//! WebSocket の受付と送信キューの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、エンコード済みのフレームを積むだけです。
//! キューへの追加はブロックしないため、Stage のガードを保持したまま呼び出せます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, StageEvent};
use crate::infrastructure::dto::websocket::ServerMessage;

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.push_to(&connection_id, &StageEvent::StreamStopped).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// Key: connection_id, Value: 送信キュー
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &StageEvent) -> Result<String, MessagePushError> {
        ServerMessage::from(event.clone())
            .to_json()
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id.into_string(), sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id.as_str());
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &StageEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id.as_str())
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.as_str().to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &StageEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(target.as_str()) {
                Some(sender) => {
                    // 一部の送信失敗は許容
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaAddress, SourceKind};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続へのエンコード済みフレームの送信
    // - broadcast: 複数接続への送信（一部の失敗は許容）
    // - 登録解除後は送信されないこと
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース（JSON の形を確認）
    // 2. push_to の失敗ケース（未登録の接続）
    // 3. broadcast の成功ケース
    // 4. broadcast の部分失敗ケース（未登録・受信側が閉じている）
    // 5. unregister 後の push_to
    // ========================================

    fn create_test_pusher() -> WebSocketMessagePusher {
        WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())))
    }

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にエンコード済みのイベントを送信できる
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(id("viewer"), tx).await;

        // when (操作):
        let result = pusher
            .push_to(
                &id("viewer"),
                &StageEvent::StreamStarted {
                    media_address: MediaAddress::new("A1".to_string()).unwrap(),
                    source_kind: SourceKind::File,
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(
                r#"{"type":"stream-started","media_address":"A1","source_kind":"file"}"#
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let pusher = create_test_pusher();

        // when (操作):
        let result = pusher
            .push_to(&id("nonexistent"), &StageEvent::StreamStopped)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nonexistent".to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数の接続にイベントをブロードキャストできる
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx1).await;
        pusher.register_client(id("bob"), tx2).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![id("alice"), id("bob")], &StageEvent::ViewerCount(2))
            .await;

        // then (期待する結果):
        let expected = r#"{"type":"viewer-count","count":2}"#.to_string();
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some(expected.clone()));
        assert_eq!(rx2.recv().await, Some(expected));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しない・閉じていてもブロードキャストは成功する
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx1).await;
        pusher.register_client(id("closed"), tx2).await;
        drop(rx2);

        // when (操作):
        let result = pusher
            .broadcast(
                vec![id("alice"), id("closed"), id("nonexistent")],
                &StageEvent::StreamStopped,
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx1.recv().await,
            Some(r#"{"type":"stream-stopped"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除した接続には送信できない
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx).await;

        // when (操作):
        pusher.unregister_client(&id("alice")).await;
        let result = pusher.push_to(&id("alice"), &StageEvent::StreamStopped).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }
}
