//! UseCase: チャット投稿
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostChatUseCase::execute() メソッド
//! - メッセージ ID の採番と、投稿者を含む全員への送信
//!
//! ### なぜこのテストが必要か
//! - メッセージ ID は削除キーを兼ねるため、同一ミリ秒内でも重複してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿が全員に届く
//! - エッジケース：固定時刻での連続投稿

use std::sync::Arc;

use yagura_shared::time::Clock;

use crate::domain::{ChatMessage, ChatText, ChatUser, MessagePusher, StageRepository, Timestamp};

use super::dispatch::dispatch;

/// チャット投稿のユースケース
pub struct PostChatUseCase {
    repository: Arc<dyn StageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl PostChatUseCase {
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

    /// 投稿を実行し、採番済みのメッセージを返す
    pub async fn execute(&self, user: ChatUser, text: ChatText) -> ChatMessage {
        let now = Timestamp::new(self.clock.now_millis());

        let mut stage = self.repository.acquire().await;
        let (message, deliveries) = stage.post_chat(user, text, now);
        tracing::debug!(
            "Chat message {} from '{}'",
            message.id,
            message.user.as_str()
        );
        dispatch(&stage, self.message_pusher.as_ref(), deliveries).await;

        message
    }
}
