//! ドメイン層のエラー

use thiserror::Error;

use super::value_object::{ConnectionId, MessageId};

/// Value Object の生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("media address must not be empty")]
    EmptyMediaAddress,

    #[error("media address must be at most {max} characters")]
    MediaAddressTooLong { max: usize },

    #[error("unknown source kind '{0}' (expected camera, screen or file)")]
    UnknownSourceKind(String),

    #[error("chat user must be at most {max} characters")]
    ChatUserTooLong { max: usize },

    #[error("chat text must not be empty")]
    EmptyChatText,

    #[error("chat text must be at most {max} characters")]
    ChatTextTooLong { max: usize },
}

/// Stage 集約の状態遷移で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("connection '{0}' is not registered")]
    UnknownConnection(ConnectionId),

    #[error("connection '{0}' is not authorized as broadcaster")]
    NotBroadcaster(ConnectionId),

    #[error("connection '{requester}' may not delete message {message_id}")]
    ModerationDenied {
        requester: ConnectionId,
        message_id: MessageId,
    },
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}

/// 配信者認証のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("password is required")]
    MissingPassword,

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid or expired token: {0}")]
    InvalidToken(String),

    #[error("failed to issue token: {0}")]
    TokenIssueFailed(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),
}
