//! Stage 集約
//!
//! 接続レジストリ・ストリームセッション・視聴者集合・チャット履歴をひとつにまとめた集約。
//! 全ての状態遷移はこの集約のメソッドとして実装され、送信すべきイベントを
//! [`Delivery`] のリストとして返します。I/O は一切行いません。
//!
//! ## 不変条件
//!
//! - `session` が Live であることと、その配信者が `registry` に登録済みであることは同値
//! - `viewers` の要素は全て `registry` に登録済み
//! - チャットのメッセージ ID は単調増加

use serde::{Deserialize, Serialize};

use super::{
    chat::{ChatHistory, ChatMessage},
    entity::{ConnectionRegistry, LiveStream, Participant, ParticipantRole, StreamSession, ViewerSet},
    error::DomainError,
    event::{Delivery, StageEvent},
    value_object::{ChatText, ChatUser, ConnectionId, MediaAddress, MessageId, SourceKind, Timestamp},
};

/// チャット削除の権限ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModerationPolicy {
    /// 配信者トークンで認証された接続のみ削除できる
    #[default]
    BroadcasterOnly,
    /// 全ての接続が削除できる
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSettings {
    pub history_capacity: usize,
    pub moderation: ModerationPolicy,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            history_capacity: super::chat::DEFAULT_HISTORY_CAPACITY,
            moderation: ModerationPolicy::default(),
        }
    }
}

/// `GET /api/stream-status` の元になる読み取り専用の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStatus {
    pub is_live: bool,
    pub viewer_count: usize,
    pub source_kind: Option<SourceKind>,
}

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// 削除された参加者（削除前の状態）
    pub participant: Participant,
    pub was_viewer: bool,
    pub stopped_stream: bool,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    registry: ConnectionRegistry,
    session: StreamSession,
    viewers: ViewerSet,
    chat: ChatHistory,
    moderation: ModerationPolicy,
}

impl Stage {
    pub fn new(settings: StageSettings) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            session: StreamSession::Idle,
            viewers: ViewerSet::new(),
            chat: ChatHistory::new(settings.history_capacity),
            moderation: settings.moderation,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    pub fn viewers(&self) -> &ViewerSet {
        &self.viewers
    }

    pub fn chat(&self) -> &ChatHistory {
        &self.chat
    }

    pub fn moderation(&self) -> ModerationPolicy {
        self.moderation
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.registry.connection_ids()
    }

    pub fn status(&self) -> StreamStatus {
        StreamStatus {
            is_live: self.session.is_live(),
            viewer_count: self.viewers.len(),
            source_kind: self.session.source_kind(),
        }
    }

    /// 新しい接続を登録し、本人向けの welcome と（あれば）チャット履歴を返す
    pub fn register(&mut self, participant: Participant) -> Result<Vec<Delivery>, DomainError> {
        let id = participant.id.clone();
        let authorized = participant.authorized;
        self.registry.register(participant)?;

        let mut deliveries = vec![Delivery::to_one(
            id.clone(),
            StageEvent::Welcome {
                connection_id: id.clone(),
                authorized,
            },
        )];
        if !self.chat.is_empty() {
            deliveries.push(Delivery::to_one(
                id,
                StageEvent::ChatHistory(self.chat.messages()),
            ));
        }
        Ok(deliveries)
    }

    /// 配信開始。既に Live の場合は配信者の置き換えとして扱う（後勝ち）
    pub fn start(
        &mut self,
        caller: &ConnectionId,
        media_address: MediaAddress,
        source_kind: SourceKind,
        now: Timestamp,
    ) -> Result<Vec<Delivery>, DomainError> {
        let participant = self
            .registry
            .get(caller)
            .ok_or_else(|| DomainError::UnknownConnection(caller.clone()))?;
        if !participant.authorized {
            return Err(DomainError::NotBroadcaster(caller.clone()));
        }

        if let Some(previous) = self.session.broadcaster().cloned()
            && &previous != caller
        {
            tracing::info!(
                "Broadcaster '{}' replaced by '{}'",
                previous.as_str(),
                caller.as_str()
            );
            self.demote(&previous);
        }

        self.session = StreamSession::Live(LiveStream {
            broadcaster: caller.clone(),
            media_address: media_address.clone(),
            source_kind,
            started_at: now,
        });
        self.registry.set_role(caller, ParticipantRole::Broadcaster);

        Ok(vec![Delivery::to_all(StageEvent::StreamStarted {
            media_address,
            source_kind,
        })])
    }

    /// 配信停止。現在の配信者以外からの要求は何もしない
    pub fn stop(&mut self, caller: &ConnectionId) -> Vec<Delivery> {
        if !self.session.is_broadcaster(caller) {
            return Vec::new();
        }
        self.end_stream()
    }

    /// 視聴者として参加。再 join は数を増やさない
    pub fn join(&mut self, caller: &ConnectionId) -> Result<Vec<Delivery>, DomainError> {
        if !self.registry.contains(caller) {
            return Err(DomainError::UnknownConnection(caller.clone()));
        }

        let inserted = self.viewers.insert(caller.clone());
        if !self.session.is_broadcaster(caller) {
            self.registry.set_role(caller, ParticipantRole::Viewer);
        }

        let mut deliveries = Vec::new();
        if inserted {
            deliveries.push(Delivery::to_all(StageEvent::ViewerCount(self.viewers.len())));
        }
        // Late-join catch-up
        if let Some(live) = self.session.live() {
            deliveries.push(Delivery::to_one(
                caller.clone(),
                StageEvent::StreamStarted {
                    media_address: live.media_address.clone(),
                    source_kind: live.source_kind,
                },
            ));
        }
        Ok(deliveries)
    }

    /// 視聴者の準備完了を配信者にだけ転送する。状態は変更しない
    pub fn ready(&self, caller: &ConnectionId, viewer_media_address: MediaAddress) -> Vec<Delivery> {
        if !self.registry.contains(caller) {
            return Vec::new();
        }
        match self.session.broadcaster() {
            Some(broadcaster) => vec![Delivery::to_one(
                broadcaster.clone(),
                StageEvent::ViewerHandshake {
                    viewer_media_address,
                },
            )],
            None => Vec::new(),
        }
    }

    /// チャット投稿。ID は `max(now, 直前の ID + 1)`
    pub fn post_chat(
        &mut self,
        user: ChatUser,
        text: ChatText,
        now: Timestamp,
    ) -> (ChatMessage, Vec<Delivery>) {
        let id = self.chat.issue_id(now);
        let message = ChatMessage::new(id, user, text, now);
        self.chat.push(message.clone());

        let deliveries = vec![Delivery::to_all(StageEvent::ChatMessage(message.clone()))];
        (message, deliveries)
    }

    /// チャット削除。存在しない ID の場合は何も送らない
    pub fn delete_chat(
        &mut self,
        requester: &ConnectionId,
        message_id: MessageId,
    ) -> Result<Vec<Delivery>, DomainError> {
        if self.moderation == ModerationPolicy::BroadcasterOnly {
            let authorized = self
                .registry
                .get(requester)
                .is_some_and(|participant| participant.authorized);
            if !authorized {
                return Err(DomainError::ModerationDenied {
                    requester: requester.clone(),
                    message_id,
                });
            }
        }

        if !self.chat.remove(message_id) {
            return Ok(Vec::new());
        }
        Ok(vec![Delivery::to_all(StageEvent::ChatDeleted(message_id))])
    }

    /// 切断時の整合性回復
    ///
    /// 視聴者集合からの削除、配信者であれば強制停止、レジストリからの削除を
    /// この順に全て行う。未登録の接続に対しては `None` を返す（二重実行しても安全）。
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<DisconnectOutcome> {
        if !self.registry.contains(id) {
            return None;
        }

        let mut deliveries = Vec::new();

        let was_viewer = self.viewers.remove(id);
        if was_viewer {
            deliveries.push(Delivery::to_all(StageEvent::ViewerCount(self.viewers.len())));
        }

        let stopped_stream = self.session.is_broadcaster(id);
        if stopped_stream {
            deliveries.extend(self.force_stop());
        }

        let participant = self.registry.unregister(id)?;

        Some(DisconnectOutcome {
            participant,
            was_viewer,
            stopped_stream,
            deliveries,
        })
    }

    /// 配信者の接続が失われたときの停止。効果は `stop` と同じ
    fn force_stop(&mut self) -> Vec<Delivery> {
        self.end_stream()
    }

    fn end_stream(&mut self) -> Vec<Delivery> {
        if let StreamSession::Live(live) = std::mem::take(&mut self.session) {
            self.demote(&live.broadcaster);
            return vec![Delivery::to_all(StageEvent::StreamStopped)];
        }
        Vec::new()
    }

    /// 配信者ではなくなった接続のロールを戻す
    fn demote(&mut self, id: &ConnectionId) {
        let role = if self.viewers.contains(id) {
            ParticipantRole::Viewer
        } else {
            ParticipantRole::Unknown
        };
        self.registry.set_role(id, role);
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(StageSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::Audience;

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn address(value: &str) -> MediaAddress {
        MediaAddress::new(value.to_string()).unwrap()
    }

    fn stage_with(connections: &[(&str, bool)]) -> Stage {
        let mut stage = Stage::default();
        for (name, authorized) in connections {
            stage
                .register(Participant::new(id(name), *authorized, Timestamp::new(0)))
                .unwrap();
        }
        stage
    }

    fn post(stage: &mut Stage, text: &str, now: i64) -> ChatMessage {
        let (message, _) = stage.post_chat(
            ChatUser::new("alice".to_string()).unwrap(),
            ChatText::new(text.to_string()).unwrap(),
            Timestamp::new(now),
        );
        message
    }

    #[test]
    fn test_register_sends_welcome_only_to_new_connection() {
        // テスト項目: 登録時に本人にだけ welcome が送られる
        // given (前提条件):
        let mut stage = Stage::default();

        // when (操作):
        let deliveries = stage
            .register(Participant::new(id("admin"), true, Timestamp::new(0)))
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            deliveries,
            vec![Delivery::to_one(
                id("admin"),
                StageEvent::Welcome {
                    connection_id: id("admin"),
                    authorized: true
                }
            )]
        );
    }

    #[test]
    fn test_register_replays_chat_history() {
        // テスト項目: 履歴があれば新規接続に送られる
        // given (前提条件):
        let mut stage = stage_with(&[("alice", false)]);
        let message = post(&mut stage, "hello", 1000);

        // when (操作):
        let deliveries = stage
            .register(Participant::new(id("late"), false, Timestamp::new(0)))
            .unwrap();

        // then (期待する結果):
        assert_eq!(deliveries.len(), 2);
        assert_eq!(
            deliveries[1],
            Delivery::to_one(id("late"), StageEvent::ChatHistory(vec![message]))
        );
    }

    #[test]
    fn test_start_broadcasts_stream_started_without_touching_viewer_count() {
        // テスト項目: 配信開始で全員に stream-started が送られ、視聴者数は変わらない
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true), ("other", false)]);

        // when (操作):
        let deliveries = stage
            .start(&id("admin"), address("A1"), SourceKind::Camera, Timestamp::new(10))
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            deliveries,
            vec![Delivery::to_all(StageEvent::StreamStarted {
                media_address: address("A1"),
                source_kind: SourceKind::Camera
            })]
        );
        assert!(stage.session().is_broadcaster(&id("admin")));
        assert_eq!(stage.status().viewer_count, 0);
        assert_eq!(
            stage.registry().get(&id("admin")).unwrap().role,
            ParticipantRole::Broadcaster
        );
    }

    #[test]
    fn test_start_without_token_is_rejected() {
        // テスト項目: 認証されていない接続は配信を開始できない
        // given (前提条件):
        let mut stage = stage_with(&[("viewer", false)]);

        // when (操作):
        let result = stage.start(&id("viewer"), address("X"), SourceKind::Screen, Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::NotBroadcaster(id("viewer"))));
        assert!(!stage.session().is_live());
    }

    #[test]
    fn test_start_while_live_replaces_broadcaster() {
        // テスト項目: Live 中の start は配信者の置き換えになり、前の配信者は降格される
        // given (前提条件):
        let mut stage = stage_with(&[("admin1", true), ("admin2", true)]);
        stage
            .start(&id("admin1"), address("A1"), SourceKind::Camera, Timestamp::new(0))
            .unwrap();

        // when (操作):
        stage
            .start(&id("admin2"), address("A2"), SourceKind::File, Timestamp::new(1))
            .unwrap();
        let stale_stop = stage.stop(&id("admin1"));

        // then (期待する結果):
        assert!(stale_stop.is_empty());
        assert!(stage.session().is_broadcaster(&id("admin2")));
        assert_eq!(stage.session().media_address(), Some(&address("A2")));
        assert_eq!(
            stage.registry().get(&id("admin1")).unwrap().role,
            ParticipantRole::Unknown
        );
    }

    #[test]
    fn test_start_then_stop_returns_to_idle() {
        // テスト項目: 同じ接続から start → stop で Idle に戻り、配信者情報が消える
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true)]);
        stage
            .start(&id("admin"), address("A1"), SourceKind::Camera, Timestamp::new(0))
            .unwrap();

        // when (操作):
        let deliveries = stage.stop(&id("admin"));

        // then (期待する結果):
        assert_eq!(deliveries, vec![Delivery::to_all(StageEvent::StreamStopped)]);
        assert_eq!(stage.session(), &StreamSession::Idle);
        assert!(stage.session().broadcaster().is_none());
        assert!(stage.session().media_address().is_none());
        assert!(stage.session().source_kind().is_none());
        assert_eq!(
            stage.registry().get(&id("admin")).unwrap().role,
            ParticipantRole::Unknown
        );
    }

    #[test]
    fn test_stop_from_non_broadcaster_is_noop() {
        // テスト項目: 配信者以外からの stop は状態を変えない
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true), ("viewer", false)]);
        stage
            .start(&id("admin"), address("A1"), SourceKind::Camera, Timestamp::new(0))
            .unwrap();
        let before = stage.session().clone();

        // when (操作):
        let deliveries = stage.stop(&id("viewer"));

        // then (期待する結果):
        assert!(deliveries.is_empty());
        assert_eq!(stage.session(), &before);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        // テスト項目: 配信していないときの stop は何もしない
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true)]);

        // when (操作):
        let deliveries = stage.stop(&id("admin"));

        // then (期待する結果):
        assert!(deliveries.is_empty());
        assert!(!stage.session().is_live());
    }

    #[test]
    fn test_join_is_idempotent() {
        // テスト項目: 同じ接続の再 join は視聴者数を増やさず、カウントも再送しない
        // given (前提条件):
        let mut stage = stage_with(&[("v1", false)]);

        // when (操作):
        let first = stage.join(&id("v1")).unwrap();
        let second = stage.join(&id("v1")).unwrap();

        // then (期待する結果):
        assert_eq!(first, vec![Delivery::to_all(StageEvent::ViewerCount(1))]);
        assert!(second.is_empty());
        assert_eq!(stage.viewers().len(), 1);
        assert_eq!(
            stage.registry().get(&id("v1")).unwrap().role,
            ParticipantRole::Viewer
        );
    }

    #[test]
    fn test_join_while_live_sends_catch_up() {
        // テスト項目: Live 中に join した視聴者は stream-started を即座に受け取る
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true), ("v1", false)]);
        stage
            .start(&id("admin"), address("A1"), SourceKind::Camera, Timestamp::new(0))
            .unwrap();

        // when (操作):
        let deliveries = stage.join(&id("v1")).unwrap();

        // then (期待する結果):
        assert_eq!(
            deliveries,
            vec![
                Delivery::to_all(StageEvent::ViewerCount(1)),
                Delivery::to_one(
                    id("v1"),
                    StageEvent::StreamStarted {
                        media_address: address("A1"),
                        source_kind: SourceKind::Camera
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_join_from_unregistered_connection_fails() {
        // テスト項目: 未登録の接続の join はエラーになり、数は変わらない
        // given (前提条件):
        let mut stage = Stage::default();

        // when (操作):
        let result = stage.join(&id("ghost"));

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::UnknownConnection(id("ghost"))));
        assert_eq!(stage.viewers().len(), 0);
    }

    #[test]
    fn test_ready_forwards_only_to_broadcaster() {
        // テスト項目: Live 中の ready は配信者にだけ転送され、状態は変わらない
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true), ("v1", false)]);
        stage
            .start(&id("admin"), address("A1"), SourceKind::Camera, Timestamp::new(0))
            .unwrap();
        stage.join(&id("v1")).unwrap();

        // when (操作):
        let first = stage.ready(&id("v1"), address("V1"));
        let second = stage.ready(&id("v1"), address("V1"));

        // then (期待する結果):
        let expected = vec![Delivery::to_one(
            id("admin"),
            StageEvent::ViewerHandshake {
                viewer_media_address: address("V1"),
            },
        )];
        assert_eq!(first, expected);
        assert_eq!(second, expected);
        assert_eq!(stage.viewers().len(), 1);
        assert!(stage.session().is_broadcaster(&id("admin")));
    }

    #[test]
    fn test_ready_when_idle_is_dropped() {
        // テスト項目: 配信していないときの ready は破棄される
        // given (前提条件):
        let mut stage = stage_with(&[("v1", false)]);
        stage.join(&id("v1")).unwrap();

        // when (操作):
        let deliveries = stage.ready(&id("v1"), address("V1"));

        // then (期待する結果):
        assert!(deliveries.is_empty());
    }

    #[test]
    fn test_message_ids_strictly_increase_within_same_millisecond() {
        // テスト項目: 同じミリ秒に投稿されてもメッセージ ID は単調増加する
        // given (前提条件):
        let mut stage = Stage::default();

        // when (操作):
        let first = post(&mut stage, "one", 5000);
        let second = post(&mut stage, "two", 5000);
        let third = post(&mut stage, "three", 4000);

        // then (期待する結果):
        assert_eq!(first.id, MessageId::new(5000));
        assert_eq!(second.id, MessageId::new(5001));
        assert_eq!(third.id, MessageId::new(5002));
    }

    #[test]
    fn test_post_chat_is_broadcast_to_everyone() {
        // テスト項目: チャットは投稿者を含む全員に配信される
        // given (前提条件):
        let mut stage = stage_with(&[("alice", false)]);

        // when (操作):
        let (message, deliveries) = stage.post_chat(
            ChatUser::new("".to_string()).unwrap(),
            ChatText::new("hi".to_string()).unwrap(),
            Timestamp::new(42),
        );

        // then (期待する結果):
        assert_eq!(message.user.as_str(), "Anonymous");
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].audience, Audience::All);
    }

    #[test]
    fn test_delete_chat_requires_authorization_by_default() {
        // テスト項目: デフォルトでは認証されていない接続はチャットを削除できない
        // given (前提条件):
        let mut stage = stage_with(&[("viewer", false)]);
        let message = post(&mut stage, "spam", 1000);

        // when (操作):
        let result = stage.delete_chat(&id("viewer"), message.id);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DomainError::ModerationDenied {
                requester: id("viewer"),
                message_id: message.id
            })
        );
        assert_eq!(stage.chat().len(), 1);
    }

    #[test]
    fn test_delete_chat_with_open_moderation() {
        // テスト項目: オープンなモデレーションでは誰でも削除でき、履歴からも消える
        // given (前提条件):
        let mut stage = Stage::new(StageSettings {
            history_capacity: 10,
            moderation: ModerationPolicy::Open,
        });
        stage
            .register(Participant::new(id("viewer"), false, Timestamp::new(0)))
            .unwrap();
        let message = post(&mut stage, "spam", 1000);

        // when (操作):
        let deliveries = stage.delete_chat(&id("viewer"), message.id).unwrap();
        let late = stage
            .register(Participant::new(id("late"), false, Timestamp::new(0)))
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            deliveries,
            vec![Delivery::to_all(StageEvent::ChatDeleted(message.id))]
        );
        // 削除済みメッセージは late joiner に送られない（履歴が空なので welcome のみ）
        assert_eq!(late.len(), 1);
    }

    #[test]
    fn test_delete_unknown_message_is_noop() {
        // テスト項目: 存在しない ID の削除は何も送らない
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true)]);

        // when (操作):
        let deliveries = stage.delete_chat(&id("admin"), MessageId::new(123)).unwrap();

        // then (期待する結果):
        assert!(deliveries.is_empty());
    }

    #[test]
    fn test_delete_old_message_beyond_history_is_broadcast() {
        // テスト項目: 多数の投稿の後でも、古いメッセージの削除は全員に配信される
        // given (前提条件):
        let mut stage = Stage::new(StageSettings {
            history_capacity: 10,
            moderation: ModerationPolicy::Open,
        });
        stage
            .register(Participant::new(id("viewer"), false, Timestamp::new(0)))
            .unwrap();
        let first = post(&mut stage, "first", 1);
        for now in 2..=1025 {
            post(&mut stage, "flood", now);
        }

        // when (操作):
        let deliveries = stage.delete_chat(&id("viewer"), first.id).unwrap();
        let again = stage.delete_chat(&id("viewer"), first.id).unwrap();

        // then (期待する結果):
        assert_eq!(
            deliveries,
            vec![Delivery::to_all(StageEvent::ChatDeleted(first.id))]
        );
        assert!(again.is_empty());
    }

    #[test]
    fn test_broadcaster_disconnect_equals_stop() {
        // テスト項目: Live 中の配信者の切断は stop と同じ効果を持つ
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true), ("v1", false)]);
        stage
            .start(&id("admin"), address("A1"), SourceKind::Camera, Timestamp::new(0))
            .unwrap();
        stage.join(&id("v1")).unwrap();

        // when (操作):
        let outcome = stage.disconnect(&id("admin")).unwrap();

        // then (期待する結果):
        assert!(outcome.stopped_stream);
        assert!(!outcome.was_viewer);
        assert_eq!(
            outcome.deliveries,
            vec![Delivery::to_all(StageEvent::StreamStopped)]
        );
        assert_eq!(stage.session(), &StreamSession::Idle);
        assert!(!stage.registry().contains(&id("admin")));
        assert_eq!(stage.viewers().len(), 1);
    }

    #[test]
    fn test_viewer_disconnect_decrements_count() {
        // テスト項目: 視聴者の切断で視聴者数が減り、新しい数が配信される
        // given (前提条件):
        let mut stage = stage_with(&[("v1", false), ("v2", false)]);
        stage.join(&id("v1")).unwrap();
        stage.join(&id("v2")).unwrap();

        // when (操作):
        let outcome = stage.disconnect(&id("v1")).unwrap();

        // then (期待する結果):
        assert!(outcome.was_viewer);
        assert_eq!(
            outcome.deliveries,
            vec![Delivery::to_all(StageEvent::ViewerCount(1))]
        );
        assert_eq!(outcome.participant.role, ParticipantRole::Viewer);
    }

    #[test]
    fn test_disconnect_runs_exactly_once() {
        // テスト項目: 同じ接続の二度目の切断処理は何もしない
        // given (前提条件):
        let mut stage = stage_with(&[("v1", false)]);
        stage.join(&id("v1")).unwrap();
        stage.disconnect(&id("v1")).unwrap();

        // when (操作):
        let second = stage.disconnect(&id("v1"));

        // then (期待する結果):
        assert!(second.is_none());
        assert_eq!(stage.viewers().len(), 0);
    }

    #[test]
    fn test_broadcaster_who_also_joined_is_fully_reconciled() {
        // テスト項目: 視聴者としても join した配信者の切断では両方の後始末が行われる
        // given (前提条件):
        let mut stage = stage_with(&[("admin", true)]);
        stage
            .start(&id("admin"), address("A1"), SourceKind::Screen, Timestamp::new(0))
            .unwrap();
        stage.join(&id("admin")).unwrap();

        // when (操作):
        let outcome = stage.disconnect(&id("admin")).unwrap();

        // then (期待する結果):
        assert!(outcome.was_viewer);
        assert!(outcome.stopped_stream);
        assert_eq!(
            outcome.deliveries,
            vec![
                Delivery::to_all(StageEvent::ViewerCount(0)),
                Delivery::to_all(StageEvent::StreamStopped),
            ]
        );
        assert_eq!(stage.status().viewer_count, 0);
        assert!(!stage.status().is_live);
    }

    #[test]
    fn test_viewer_count_matches_joined_connections_for_any_sequence() {
        // テスト項目: join/切断の任意の順序で視聴者数は接続中の join 済み接続数と一致する
        // given (前提条件):
        let names = ["a", "b", "c", "d", "e"];
        let mut stage = stage_with(&names.iter().map(|n| (*n, false)).collect::<Vec<_>>());

        // when (操作):
        stage.join(&id("a")).unwrap();
        stage.join(&id("b")).unwrap();
        stage.disconnect(&id("c")).unwrap(); // join していない接続の切断
        stage.join(&id("b")).unwrap();
        stage.disconnect(&id("a")).unwrap();
        stage.join(&id("d")).unwrap();
        stage.join(&id("e")).unwrap();
        stage.disconnect(&id("e")).unwrap();

        // then (期待する結果):
        assert_eq!(stage.status().viewer_count, 2);
        assert!(stage.viewers().contains(&id("b")));
        assert!(stage.viewers().contains(&id("d")));
    }
}
