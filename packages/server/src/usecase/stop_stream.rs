//! UseCase: 配信停止
//!
//! 現在の配信者以外からの停止要求は何もしない（エラーも返さない）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, StageRepository};

use super::dispatch::dispatch;

/// 配信停止のユースケース
pub struct StopStreamUseCase {
    repository: Arc<dyn StageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl StopStreamUseCase {
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 配信停止を実行し、実際に停止したかどうかを返す
    pub async fn execute(&self, caller: &ConnectionId) -> bool {
        let mut stage = self.repository.acquire().await;
        let deliveries = stage.stop(caller);
        if deliveries.is_empty() {
            tracing::debug!("Ignoring stop-stream from non-broadcaster '{}'", caller);
            return false;
        }

        tracing::info!("Stream stopped by '{}'", caller);
        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;
        true
    }
}
