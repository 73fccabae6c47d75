//! 配信者認証の抽象化
//!
//! 資格情報の検証とトークンの発行・検証は外部の協力者に委譲する。
//! コアが知りたいのは「この接続は配信者として認可されているか」だけ。

use super::{AuthError, Timestamp};

/// 発行済みのセッショントークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// 検証済みトークンの内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcasterClaims {
    pub role: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

#[cfg_attr(test, mockall::automock)]
pub trait BroadcasterAuthenticator: Send + Sync {
    /// パスワードを検証し、配信者トークンを発行
    fn login(&self, password: &str) -> Result<IssuedToken, AuthError>;

    /// トークンを検証
    fn verify(&self, token: &str) -> Result<BroadcasterClaims, AuthError>;
}
