//! UseCase: 視聴者としての参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinViewerUseCase::execute() メソッド
//! - 視聴者数の集計と、配信中に参加した視聴者への stream-started の再送
//!
//! ### なぜこのテストが必要か
//! - 再 join で視聴者数が二重に数えられないことを保証
//! - 途中参加の視聴者が配信先を知る手段はこの再送だけ
//!
//! ### どのような状況を想定しているか
//! - 正常系：配信前の join、配信中の join
//! - エッジケース：同じ接続からの再 join

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, StageRepository};

use super::{dispatch::dispatch, error::JoinError};

/// 視聴参加のユースケース
pub struct JoinViewerUseCase {
    repository: Arc<dyn StageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinViewerUseCase {
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 視聴参加を実行し、参加後の視聴者数を返す
    pub async fn execute(&self, caller: &ConnectionId) -> Result<usize, JoinError> {
        let mut stage = self.repository.acquire().await;
        let deliveries = stage
            .join(caller)
            .map_err(|_| JoinError::UnknownConnection(caller.as_str().to_string()))?;

        let viewer_count = stage.viewers().len();
        tracing::debug!("Viewer '{}' joined ({} watching)", caller, viewer_count);
        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;

        Ok(viewer_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MediaAddress, SourceKind, StageEvent, Timestamp},
        usecase::testing::{NOW, create_test_pusher, create_test_repository, id, register},
    };

    #[tokio::test]
    async fn test_join_broadcasts_viewer_count() {
        // テスト項目: join すると全員に新しい視聴者数が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        register(&repository, "admin", true).await;
        register(&repository, "viewer", false).await;
        let usecase = JoinViewerUseCase::new(repository, pusher.clone());

        // when (操作):
        let count = usecase.execute(&id("viewer")).await.unwrap();

        // then (期待する結果):
        assert_eq!(count, 1);
        assert_eq!(
            pusher.events_for(&id("admin")).await,
            vec![StageEvent::ViewerCount(1)]
        );
        // 配信前なので stream-started は届かない
        assert_eq!(
            pusher.events_for(&id("viewer")).await,
            vec![StageEvent::ViewerCount(1)]
        );
    }

    #[tokio::test]
    async fn test_join_while_live_receives_catch_up() {
        // テスト項目: 配信中に join した視聴者には本人にだけ stream-started が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        register(&repository, "admin", true).await;
        register(&repository, "viewer", false).await;
        repository
            .acquire()
            .await
            .start(
                &id("admin"),
                MediaAddress::new("A1".to_string()).unwrap(),
                SourceKind::Camera,
                Timestamp::new(NOW),
            )
            .unwrap();
        let usecase = JoinViewerUseCase::new(repository, pusher.clone());

        // when (操作):
        usecase.execute(&id("viewer")).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            pusher.events_for(&id("viewer")).await,
            vec![
                StageEvent::ViewerCount(1),
                StageEvent::StreamStarted {
                    media_address: MediaAddress::new("A1".to_string()).unwrap(),
                    source_kind: SourceKind::Camera,
                }
            ]
        );
        assert_eq!(
            pusher.events_for(&id("admin")).await,
            vec![StageEvent::ViewerCount(1)]
        );
    }

    #[tokio::test]
    async fn test_rejoin_does_not_double_count() {
        // テスト項目: 同じ接続の再 join では視聴者数は増えず、数も再送されない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        register(&repository, "viewer", false).await;
        let usecase = JoinViewerUseCase::new(repository, pusher.clone());
        usecase.execute(&id("viewer")).await.unwrap();
        pusher.clear().await;

        // when (操作):
        let count = usecase.execute(&id("viewer")).await.unwrap();

        // then (期待する結果):
        assert_eq!(count, 1);
        assert_eq!(pusher.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_join_unknown_connection() {
        // テスト項目: 未登録の接続の join はエラーになる
        // given (前提条件):
        let usecase = JoinViewerUseCase::new(create_test_repository(), create_test_pusher());

        // when (操作):
        let result = usecase.execute(&id("ghost")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinError::UnknownConnection("ghost".to_string()))
        );
    }
}
