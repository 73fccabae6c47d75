//! UseCase: チャット削除（モデレーション）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeleteChatUseCase::execute() メソッド
//! - モデレーションポリシーによる権限判定、chat-deleted の全体送信
//!
//! ### なぜこのテストが必要か
//! - 削除されたメッセージは後から接続した参加者の履歴にも現れてはならない
//! - 権限のない接続による削除を防ぐ
//!
//! ### どのような状況を想定しているか
//! - 正常系：配信者による削除
//! - 異常系：トークンなしの接続による削除（broadcaster-only）
//! - エッジケース：存在しない ID、open モデレーション

use std::sync::Arc;

use crate::domain::{ConnectionId, MessageId, MessagePusher, StageRepository};

use super::{dispatch::dispatch, error::DeleteChatError};

/// チャット削除のユースケース
pub struct DeleteChatUseCase {
    repository: Arc<dyn StageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DeleteChatUseCase {
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 削除を実行。存在しない ID の場合は `Ok(false)`
    pub async fn execute(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
    ) -> Result<bool, DeleteChatError> {
        let mut stage = self.repository.acquire().await;
        let deliveries = stage
            .delete_chat(requester, message_id)
            .map_err(|_| DeleteChatError::Unauthorized)?;
        if deliveries.is_empty() {
            tracing::debug!("Ignoring delete of unknown message {}", message_id);
            return Ok(false);
        }

        tracing::info!("Chat message {} deleted by '{}'", message_id, requester);
        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;
        Ok(true)
    }
}
