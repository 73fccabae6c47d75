//! UseCase テスト用のヘルパー

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use yagura_shared::time::FixedClock;

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, Participant, PusherChannel, Stage,
        StageEvent, StageRepository, StageSettings, Timestamp,
    },
    infrastructure::repository::InMemoryStageRepository,
};

pub const NOW: i64 = 1672531200000;

/// 送信されたイベントを記録するだけの MessagePusher
#[derive(Default)]
pub struct RecordingMessagePusher {
    registered: Mutex<Vec<ConnectionId>>,
    sent: Mutex<Vec<(ConnectionId, StageEvent)>>,
}

impl RecordingMessagePusher {
    /// 指定した接続が受け取ったイベント（送信順）
    pub async fn events_for(&self, id: &ConnectionId) -> Vec<StageEvent> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }

    pub async fn is_registered(&self, id: &ConnectionId) -> bool {
        self.registered.lock().await.contains(id)
    }
}

#[async_trait]
impl MessagePusher for RecordingMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().await.push(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.registered.lock().await.retain(|id| id != connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &StageEvent,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .await
            .push((connection_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &StageEvent,
    ) -> Result<(), MessagePushError> {
        let mut sent = self.sent.lock().await;
        for target in targets {
            sent.push((target, event.clone()));
        }
        Ok(())
    }
}

pub fn id(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}

pub fn create_test_repository() -> Arc<InMemoryStageRepository> {
    create_test_repository_with(StageSettings::default())
}

pub fn create_test_repository_with(settings: StageSettings) -> Arc<InMemoryStageRepository> {
    Arc::new(InMemoryStageRepository::new(Arc::new(Mutex::new(
        Stage::new(settings),
    ))))
}

pub fn create_test_pusher() -> Arc<RecordingMessagePusher> {
    Arc::new(RecordingMessagePusher::default())
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NOW))
}

/// 参加者を Stage に直接登録する（welcome などは送らない）
pub async fn register(repository: &InMemoryStageRepository, name: &str, authorized: bool) {
    repository
        .acquire()
        .await
        .register(Participant::new(id(name), authorized, Timestamp::new(NOW)))
        .unwrap();
}
