//! UseCase 層のエラー
//!
//! UI 層はこれらを HTTP ステータスコードや `error` イベントに変換します。

use thiserror::Error;

use crate::domain::AuthError;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already connected")]
    DuplicateConnection(String),

    #[error("connection rejected: {0}")]
    Rejected(String),
}

/// 配信開始のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartStreamError {
    #[error("only an authorized broadcaster can start the stream")]
    Unauthorized,

    #[error("connection '{0}' is not connected")]
    UnknownConnection(String),
}

/// 視聴参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("connection '{0}' is not connected")]
    UnknownConnection(String),
}

/// チャット削除のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteChatError {
    #[error("only the broadcaster can delete chat messages")]
    Unauthorized,
}

/// ログインのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("password is required")]
    MissingPassword,

    #[error("invalid password")]
    InvalidPassword,

    #[error("failed to issue token: {0}")]
    Internal(String),
}

impl From<AuthError> for LoginError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPassword => LoginError::MissingPassword,
            AuthError::InvalidPassword => LoginError::InvalidPassword,
            AuthError::InvalidToken(reason)
            | AuthError::TokenIssueFailed(reason)
            | AuthError::PasswordHash(reason) => LoginError::Internal(reason),
        }
    }
}

/// トークン検証のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyTokenError {
    #[error("token is missing")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,
}
