//! Stage の状態遷移が生み出す送信イベント
//!
//! イベントはプロトコルに依存しない。ワイヤ形式への変換は infrastructure 層が行う。

use super::{
    chat::ChatMessage,
    value_object::{ConnectionId, MediaAddress, MessageId, SourceKind},
};

/// 送信先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// 接続中の全ての参加者
    All,
    /// 特定の参加者のみ
    One(ConnectionId),
}

/// 参加者へ送るイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    /// 接続直後に本人へ送る識別情報
    Welcome {
        connection_id: ConnectionId,
        authorized: bool,
    },
    ChatHistory(Vec<ChatMessage>),
    StreamStarted {
        media_address: MediaAddress,
        source_kind: SourceKind,
    },
    StreamStopped,
    ViewerCount(usize),
    ViewerHandshake {
        viewer_media_address: MediaAddress,
    },
    ChatMessage(ChatMessage),
    ChatDeleted(MessageId),
}

/// 送信先とイベントの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub audience: Audience,
    pub event: StageEvent,
}

impl Delivery {
    pub fn to_all(event: StageEvent) -> Self {
        Self {
            audience: Audience::All,
            event,
        }
    }

    pub fn to_one(target: ConnectionId, event: StageEvent) -> Self {
        Self {
            audience: Audience::One(target),
            event,
        }
    }
}
