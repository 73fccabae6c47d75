//! UseCase: 配信者のログインとトークン検証
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute(), VerifyTokenUseCase::execute() / authorize()
//! - BroadcasterAuthenticator のエラーがユースケースのエラーに変換されること
//!
//! ### なぜこのテストが必要か
//! - UI 層はこれらのエラーから HTTP ステータス（400 / 401）を決める
//! - トークンなしの接続は視聴者として受け入れ、不正なトークンは拒否する
//!
//! ### どのような状況を想定しているか
//! - 正常系：ログイン成功、トークン検証成功
//! - 異常系：空パスワード、誤ったパスワード、不正なトークン
//! - エッジケース：トークンなしでの接続

use std::sync::Arc;

use crate::domain::{BroadcasterAuthenticator, BroadcasterClaims, IssuedToken};

use super::error::{LoginError, VerifyTokenError};

/// ログインのユースケース
pub struct LoginUseCase {
    authenticator: Arc<dyn BroadcasterAuthenticator>,
}

impl LoginUseCase {
    pub fn new(authenticator: Arc<dyn BroadcasterAuthenticator>) -> Self {
        Self { authenticator }
    }

    pub fn execute(&self, password: &str) -> Result<IssuedToken, LoginError> {
        let issued = self.authenticator.login(password)?;
        tracing::info!("Broadcaster logged in");
        Ok(issued)
    }
}

/// トークン検証のユースケース
pub struct VerifyTokenUseCase {
    authenticator: Arc<dyn BroadcasterAuthenticator>,
}

impl VerifyTokenUseCase {
    pub fn new(authenticator: Arc<dyn BroadcasterAuthenticator>) -> Self {
        Self { authenticator }
    }

    pub fn execute(&self, token: &str) -> Result<BroadcasterClaims, VerifyTokenError> {
        if token.is_empty() {
            return Err(VerifyTokenError::MissingToken);
        }
        self.authenticator.verify(token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            VerifyTokenError::InvalidToken
        })
    }

    /// WebSocket 接続時の認可
    ///
    /// トークンなしは未認可の参加者として `Ok(false)`、有効なトークンは `Ok(true)`。
    /// 不正なトークンはエラー（接続を拒否する）。
    pub fn authorize(&self, token: Option<&str>) -> Result<bool, VerifyTokenError> {
        match token {
            None | Some("") => Ok(false),
            Some(token) => self.execute(token).map(|_| true),
        }
    }
}
