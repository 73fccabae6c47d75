//! UseCase: 配信状態の取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{Stage, StageRepository, StreamStatus};

/// `GET /api/stream-status` のユースケース
pub struct GetStreamStatusUseCase {
    repository: Arc<dyn StageRepository>,
}

impl GetStreamStatusUseCase {
    pub fn new(repository: Arc<dyn StageRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> StreamStatus {
        self.repository.acquire().await.status()
    }
}

/// `GET /debug/stage` のユースケース
pub struct GetStageSnapshotUseCase {
    repository: Arc<dyn StageRepository>,
}

impl GetStageSnapshotUseCase {
    pub fn new(repository: Arc<dyn StageRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Stage {
        self.repository.snapshot().await
    }
}
