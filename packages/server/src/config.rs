//! Server configuration (command line flags and environment variables).

use clap::Parser;

use crate::{
    domain::{AuthError, ModerationPolicy, StageSettings, chat::DEFAULT_HISTORY_CAPACITY},
    infrastructure::auth::{
        JwtSettings, hash_password, jwt::DEFAULT_TOKEN_TTL_HOURS, password::DEFAULT_COST,
    },
};

/// 未設定時の管理者パスワード（起動時に警告を出す）
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// 全オリジンを許可する CORS 設定値
pub const ANY_ORIGIN: &str = "*";

#[derive(Parser, Debug, Clone)]
#[command(name = "yagura-server")]
#[command(about = "Signaling and chat server for single-broadcaster live streaming", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "YAGURA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "YAGURA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Password the broadcaster logs in with (hashed once at startup)
    #[arg(long, env = "YAGURA_ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
    pub admin_password: String,

    /// bcrypt hash of the admin password; takes precedence over --admin-password
    #[arg(long, env = "YAGURA_ADMIN_PASSWORD_HASH", hide_env_values = true)]
    pub admin_password_hash: Option<String>,

    /// Print the bcrypt hash of PASSWORD and exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,

    /// Secret used to sign broadcaster tokens (random per process when omitted)
    #[arg(long, env = "YAGURA_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Lifetime of issued broadcaster tokens, in hours
    #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
    pub token_ttl_hours: u64,

    /// Number of chat messages replayed to new connections (0 disables history)
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub chat_history: usize,

    /// Let every connection delete chat messages, not only the broadcaster
    #[arg(long)]
    pub open_moderation: bool,

    /// Origins allowed to call the HTTP API, comma separated (`*` allows any)
    #[arg(long, env = "YAGURA_CORS_ORIGIN", default_value = ANY_ORIGIN)]
    pub cors_origin: String,
}

impl ServerConfig {
    fn configured_hash(&self) -> Option<&str> {
        self.admin_password_hash
            .as_deref()
            .filter(|hash| !hash.is_empty())
    }

    pub fn uses_default_password(&self) -> bool {
        self.configured_hash().is_none() && self.admin_password == DEFAULT_ADMIN_PASSWORD
    }

    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            history_capacity: self.chat_history,
            moderation: if self.open_moderation {
                ModerationPolicy::Open
            } else {
                ModerationPolicy::BroadcasterOnly
            },
        }
    }

    /// 署名鍵（未指定ならプロセスごとのランダム値）
    pub fn signing_secret(&self) -> String {
        self.jwt_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(JwtSettings::random_secret)
    }

    /// ハッシュが指定されていればそれを使い、なければ平文パスワードをここで一度だけハッシュ化する
    pub fn jwt_settings(&self) -> Result<JwtSettings, AuthError> {
        let admin_password_hash = match self.configured_hash() {
            Some(hash) => hash.to_string(),
            None => hash_password(&self.admin_password, DEFAULT_COST)?,
        };
        Ok(JwtSettings {
            admin_password_hash,
            secret: self.signing_secret(),
            ttl_hours: self.token_ttl_hours,
        })
    }
}
