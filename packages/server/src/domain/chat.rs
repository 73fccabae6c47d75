//! チャットメッセージと、後から接続した参加者に再送する有限長の履歴

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use super::value_object::{ChatText, ChatUser, MessageId, Timestamp};

/// 覚えておく削除済み ID の数
///
/// これより古い削除済み ID への再削除は、もう一度 `chat-deleted` が送られるだけで害はない。
pub const TOMBSTONE_CAPACITY: usize = 1024;

/// 新しい接続に再送するメッセージ数のデフォルト
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user: ChatUser,
    pub text: ChatText,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(id: MessageId, user: ChatUser, text: ChatText, sent_at: Timestamp) -> Self {
        Self {
            id,
            user,
            text,
            sent_at,
        }
    }
}

/// チャット履歴
///
/// メッセージ ID の発行、直近 `capacity` 件の保持、削除済み ID の記録を受け持つ。
/// ID は単調増加なので、発行済みの最大 ID 以下で削除済みでないものは全て削除対象になる。
#[derive(Debug, Clone, Serialize)]
pub struct ChatHistory {
    capacity: usize,
    messages: VecDeque<ChatMessage>,
    last_issued: i64,
    #[serde(skip)]
    tombstones: BTreeSet<MessageId>,
}

impl ChatHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity),
            last_issued: 0,
            tombstones: BTreeSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 次のメッセージ ID。`max(now, 直前の ID + 1)` で、同じミリ秒内でも重複しない
    pub fn issue_id(&mut self, now: Timestamp) -> MessageId {
        let id = now.value().max(self.last_issued + 1);
        self.last_issued = id;
        MessageId::new(id)
    }

    /// 履歴に追加する。容量を超えた分は古い順に捨てる
    pub fn push(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// 削除する。未発行または削除済みの ID なら `false`
    ///
    /// 履歴から押し出された古いメッセージも、クライアントの画面には残っているので削除対象とする。
    pub fn remove(&mut self, id: MessageId) -> bool {
        if id.value() <= 0 || id.value() > self.last_issued {
            return false;
        }
        if !self.tombstones.insert(id) {
            return false;
        }
        while self.tombstones.len() > TOMBSTONE_CAPACITY {
            self.tombstones.pop_first();
        }
        self.messages.retain(|message| message.id != id);
        true
    }

    /// 保持しているメッセージ（古い順）
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
