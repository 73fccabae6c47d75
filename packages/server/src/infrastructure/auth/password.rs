//! bcrypt による管理者パスワードのハッシュ化と照合

use crate::domain::AuthError;

pub use bcrypt::DEFAULT_COST;

/// パスワードを bcrypt でハッシュ化する（`$2b$...` 形式）
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// 平文とハッシュを照合する。比較は定数時間で行われる
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordHash(e.to_string()))
}
