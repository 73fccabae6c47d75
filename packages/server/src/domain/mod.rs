//! Domain 層
//!
//! 値オブジェクト・エンティティ・Stage 集約と、集約が必要とするポート（trait）を定義します。

pub mod authenticator;
pub mod chat;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod stage;
pub mod value_object;

pub use authenticator::{BroadcasterAuthenticator, BroadcasterClaims, IssuedToken};
pub use chat::{ChatHistory, ChatMessage};
pub use entity::{
    ConnectionRegistry, LiveStream, Participant, ParticipantRole, StreamSession, ViewerSet,
};
pub use error::{AuthError, DomainError, MessagePushError, ValueObjectError};
pub use event::{Audience, Delivery, StageEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{StageGuard, StageRepository};
pub use stage::{DisconnectOutcome, ModerationPolicy, Stage, StageSettings, StreamStatus};
pub use value_object::{
    ChatText, ChatUser, ConnectionId, ConnectionIdFactory, MediaAddress, MessageId, SourceKind,
    Timestamp,
};

#[cfg(test)]
pub use authenticator::MockBroadcasterAuthenticator;
