//! UseCase: 配信開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StartStreamUseCase::execute() メソッド
//! - 配信者トークンの有無による認可、stream-started の全体送信
//!
//! ### なぜこのテストが必要か
//! - 認可されていない接続が配信を乗っ取れないことを保証
//! - 配信中の再 start が配信者の置き換えとして扱われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：認可済み接続による開始
//! - 異常系：トークンなしの接続による開始、未登録の接続
//! - エッジケース：配信中に別の配信者が開始（後勝ち）

use std::sync::Arc;

use yagura_shared::time::Clock;

use crate::domain::{
    ConnectionId, DomainError, MediaAddress, MessagePusher, SourceKind, StageRepository,
    Timestamp,
};

use super::{dispatch::dispatch, error::StartStreamError};

/// 配信開始のユースケース
pub struct StartStreamUseCase {
    repository: Arc<dyn StageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl StartStreamUseCase {
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 配信開始を実行
    ///
    /// 成功すると全ての接続に `stream-started` が送られる。
    /// 失敗した場合はセッションの状態は変わらない。
    pub async fn execute(
        &self,
        caller: &ConnectionId,
        media_address: MediaAddress,
        source_kind: SourceKind,
    ) -> Result<(), StartStreamError> {
        let now = Timestamp::new(self.clock.now_millis());

        let mut stage = self.repository.acquire().await;
        let deliveries = stage
            .start(caller, media_address, source_kind, now)
            .map_err(|e| match e {
                DomainError::UnknownConnection(id) => {
                    StartStreamError::UnknownConnection(id.into_string())
                }
                _ => StartStreamError::Unauthorized,
            })?;

        tracing::info!(
            "Stream started by '{}' (source: {})",
            caller,
            source_kind
        );
        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;

        Ok(())
    }
}
