//! エンティティ
//!
//! 参加者・接続レジストリ・ストリームセッション・視聴者集合を表現します。

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{
    error::DomainError,
    value_object::{ConnectionId, MediaAddress, SourceKind, Timestamp},
};

/// 参加者の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// まだ役割を宣言していない接続
    #[default]
    Unknown,
    Broadcaster,
    Viewer,
}

/// 接続中の参加者
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: ConnectionId,
    pub role: ParticipantRole,
    /// 接続時に有効な配信者トークンを提示したかどうか
    pub authorized: bool,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, authorized: bool, connected_at: Timestamp) -> Self {
        Self {
            id,
            role: ParticipantRole::Unknown,
            authorized,
            connected_at,
        }
    }
}

/// 接続レジストリ
///
/// 接続中の全参加者とその役割を保持する受動的なストア。
/// 配信者が 1 人であることはここではなく Stage の start 遷移で保証する。
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectionRegistry {
    participants: HashMap<ConnectionId, Participant>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 参加者を unknown ロールで登録
    pub fn register(&mut self, participant: Participant) -> Result<(), DomainError> {
        if self.participants.contains_key(&participant.id) {
            return Err(DomainError::DuplicateConnection(participant.id));
        }
        self.participants.insert(participant.id.clone(), participant);
        Ok(())
    }

    /// ロールを更新（冪等）。登録されていない場合は false を返す
    pub fn set_role(&mut self, id: &ConnectionId, role: ParticipantRole) -> bool {
        match self.participants.get_mut(id) {
            Some(participant) => {
                participant.role = role;
                true
            }
            None => false,
        }
    }

    /// 参加者を削除し、削除前の情報を返す
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Participant> {
        self.participants.remove(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.participants.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// 接続中の全ての接続 ID（ソート済み）
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.participants.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// 接続中の参加者一覧（接続 ID でソート済み）
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        participants
    }
}

/// 配信中のストリーム情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStream {
    pub broadcaster: ConnectionId,
    pub media_address: MediaAddress,
    pub source_kind: SourceKind,
    pub started_at: Timestamp,
}

/// ストリームセッション
///
/// `Live` の間だけ配信者・メディアアドレス・ソース種別が存在する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StreamSession {
    #[default]
    Idle,
    Live(LiveStream),
}

impl StreamSession {
    pub fn is_live(&self) -> bool {
        matches!(self, StreamSession::Live(_))
    }

    pub fn live(&self) -> Option<&LiveStream> {
        match self {
            StreamSession::Live(live) => Some(live),
            StreamSession::Idle => None,
        }
    }

    pub fn broadcaster(&self) -> Option<&ConnectionId> {
        self.live().map(|live| &live.broadcaster)
    }

    pub fn media_address(&self) -> Option<&MediaAddress> {
        self.live().map(|live| &live.media_address)
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.live().map(|live| live.source_kind)
    }

    pub fn is_broadcaster(&self, id: &ConnectionId) -> bool {
        self.broadcaster() == Some(id)
    }
}

/// 視聴者として join した接続の集合
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewerSet {
    viewers: HashSet<ConnectionId>,
}

impl ViewerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加した場合は true、既に含まれていた場合は false
    pub fn insert(&mut self, id: ConnectionId) -> bool {
        self.viewers.insert(id)
    }

    /// 削除した場合は true
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        self.viewers.remove(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.viewers.contains(id)
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }
}
