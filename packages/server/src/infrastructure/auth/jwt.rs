//! JWT を使った BroadcasterAuthenticator 実装
//!
//! 管理者パスワードを bcrypt ハッシュと照合し、`role = "admin"` の HS256 署名トークンを発行します。
//! 有効期限の判定は注入された `Clock` で行うため、テストでも時刻を固定できます。

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use yagura_shared::time::Clock;

use super::password::verify_password;
use crate::domain::{AuthError, BroadcasterAuthenticator, BroadcasterClaims, IssuedToken, Timestamp};

/// トークンに埋め込むロール名
pub const ADMIN_ROLE: &str = "admin";

/// デフォルトのトークン有効期間（時間）
pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;

/// JWT のクレーム（`iat` / `exp` は秒単位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    role: String,
    iat: i64,
    exp: i64,
}

/// JwtAuthenticator の設定値
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// 管理者パスワードの bcrypt ハッシュ
    pub admin_password_hash: String,
    pub secret: String,
    pub ttl_hours: u64,
}

impl JwtSettings {
    /// プロセスごとにランダムな署名鍵を生成
    pub fn random_secret() -> String {
        format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
    }
}

pub struct JwtAuthenticator {
    admin_password_hash: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl JwtAuthenticator {
    pub fn new(settings: JwtSettings, clock: Arc<dyn Clock>) -> Self {
        let ttl_hours = i64::try_from(settings.ttl_hours).unwrap_or(i64::MAX / 3_600_000);
        Self {
            admin_password_hash: settings.admin_password_hash,
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            ttl_millis: ttl_hours.saturating_mul(3_600_000),
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked against the injected clock
        validation.validate_exp = false;
        validation
    }
}

impl BroadcasterAuthenticator for JwtAuthenticator {
    fn login(&self, password: &str) -> Result<IssuedToken, AuthError> {
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }
        if !verify_password(password, &self.admin_password_hash)? {
            return Err(AuthError::InvalidPassword);
        }

        let now = self.clock.now_millis();
        let expires_at = now.saturating_add(self.ttl_millis);
        let claims = Claims {
            role: ADMIN_ROLE.to_string(),
            iat: now / 1000,
            exp: expires_at / 1000,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssueFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: Timestamp::new(claims.exp * 1000),
        })
    }

    fn verify(&self, token: &str) -> Result<BroadcasterClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let claims = data.claims;

        let expires_at = claims.exp.saturating_mul(1000);
        if expires_at <= self.clock.now_millis() {
            return Err(AuthError::InvalidToken("token expired".to_string()));
        }
        if claims.role != ADMIN_ROLE {
            return Err(AuthError::InvalidToken(format!(
                "unexpected role '{}'",
                claims.role
            )));
        }

        Ok(BroadcasterClaims {
            role: claims.role,
            issued_at: Timestamp::new(claims.iat.saturating_mul(1000)),
            expires_at: Timestamp::new(expires_at),
        })
    }
}
