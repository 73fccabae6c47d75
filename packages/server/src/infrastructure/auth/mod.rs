//! 配信者認証の実装
//!
//! - `jwt`: 管理者パスワードによるログインと HS256 署名トークン
//! - `password`: bcrypt による管理者パスワードのハッシュ化と照合

pub mod jwt;
pub mod password;

pub use jwt::{JwtAuthenticator, JwtSettings};
pub use password::{hash_password, verify_password};
