//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 視聴者集合からの削除、配信者であれば強制停止、レジストリからの削除
//!
//! ### なぜこのテストが必要か
//! - 配信者の切断は明示的な stop と同じ結果にならなければならない
//! - 視聴者数が負にならず、切断済みの接続を数えないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：視聴者の切断、配信者の切断
//! - エッジケース：同じ接続の二重切断

use std::sync::Arc;

use crate::domain::{ConnectionId, DisconnectOutcome, MessagePusher, StageRepository};

use super::dispatch::dispatch;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn StageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(DisconnectOutcome)` - 切断した参加者と、その結果起きたこと
    /// * `None` - 既に切断済み（何もしない）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<DisconnectOutcome> {
        let mut stage = self.repository.acquire().await;
        let outcome = stage.disconnect(connection_id);

        self.message_pusher.unregister_client(connection_id).await;

        let outcome = outcome?;
        if outcome.stopped_stream {
            tracing::info!("Broadcaster '{}' disconnected, stream stopped", connection_id);
        }
        dispatch(&stage, self.message_pusher.as_ref(), outcome.deliveries.clone()).await;

        Some(outcome)
    }
}
