//! UseCase: 視聴者の準備完了（ハンドシェイクの仲介）
//!
//! 配信中であれば配信者にだけ `viewer-handshake` を転送する。
//! Stage の状態は一切変更しない。

use std::sync::Arc;

use crate::domain::{ConnectionId, MediaAddress, MessagePusher, StageRepository};

use super::dispatch::dispatch;

/// 視聴者準備完了のユースケース
pub struct ViewerReadyUseCase {
    repository: Arc<dyn StageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ViewerReadyUseCase {
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 配信者に転送した場合は true
    pub async fn execute(&self, caller: &ConnectionId, viewer_media_address: MediaAddress) -> bool {
        let stage = self.repository.acquire().await;
        let deliveries = stage.ready(caller, viewer_media_address);
        if deliveries.is_empty() {
            tracing::debug!("Dropping ready from '{}': no live stream", caller);
            return false;
        }

        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;
        true
    }
}
