//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 参加者の登録と、本人への welcome / chat-history の送信
//!
//! ### なぜこのテストが必要か
//! - 全ての接続は unknown ロールで始まることを保証
//! - 後から接続した参加者が直近のチャットを受け取れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続（履歴なし / 履歴あり）
//! - 異常系：同じ接続 ID での二重接続

use std::sync::Arc;

use yagura_shared::time::Clock;

use crate::domain::{
    ConnectionId, DomainError, MessagePusher, Participant, PusherChannel, StageRepository,
    Timestamp,
};

use super::{dispatch::dispatch, error::ConnectError};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn StageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
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

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - サーバーが払い出した接続 ID
    /// * `authorized` - 接続時に有効な配信者トークンを提示したかどうか
    /// * `sender` - クライアントへの送信キュー
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 登録された参加者
    /// * `Err(ConnectError)` - 接続 ID が重複している
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        authorized: bool,
        sender: PusherChannel,
    ) -> Result<Participant, ConnectError> {
        let participant = Participant::new(
            connection_id.clone(),
            authorized,
            Timestamp::new(self.clock.now_millis()),
        );

        let mut stage = self.repository.acquire().await;
        let deliveries = stage.register(participant.clone()).map_err(|e| match e {
            DomainError::DuplicateConnection(id) => {
                ConnectError::DuplicateConnection(id.into_string())
            }
            other => ConnectError::Rejected(other.to_string()),
        })?;

        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;

        Ok(participant)
    }
}
