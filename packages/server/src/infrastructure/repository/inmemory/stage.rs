//! InMemory Stage Repository 実装
//!
//! ドメイン層が定義する StageRepository trait の具体的な実装。
//! Stage 集約をひとつの `tokio::sync::Mutex` の中に保持します。
//!
//! 状態はプロセス再起動で失われます（永続化はしない）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Stage, StageGuard, StageRepository};

/// インメモリ Stage Repository 実装
pub struct InMemoryStageRepository {
    stage: Arc<Mutex<Stage>>,
}

impl InMemoryStageRepository {
    pub fn new(stage: Arc<Mutex<Stage>>) -> Self {
        Self { stage }
    }
}

#[async_trait]
impl StageRepository for InMemoryStageRepository {
    async fn acquire(&self) -> StageGuard {
        self.stage.clone().lock_owned().await
    }

    async fn snapshot(&self) -> Stage {
        let stage = self.stage.lock().await;
        stage.clone()
    }
}
