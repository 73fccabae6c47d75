//! Yagura signaling and chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yagura-server
//! cargo run --bin yagura-server -- --host 0.0.0.0 --port 3000 --admin-password s3cret
//! cargo run --bin yagura-server -- --hash-password s3cret
//! cargo run --bin yagura-server -- --admin-password-hash '$2b$12$...' --cors-origin https://watch.example.com
//! ```

use std::sync::Arc;

use clap::Parser;
use yagura_server::{
    app::build_app_state,
    config::ServerConfig,
    infrastructure::auth::{hash_password, password::DEFAULT_COST},
    ui::Server,
};
use yagura_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::parse();

    if let Some(password) = &config.hash_password {
        match hash_password(password, DEFAULT_COST) {
            Ok(hash) => {
                println!("{}", hash);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to hash password: {}", e);
                std::process::exit(1);
            }
        }
    }

    if config.uses_default_password() {
        tracing::warn!(
            "Using the default admin password; set --admin-password-hash or YAGURA_ADMIN_PASSWORD_HASH"
        );
    }
    if config.jwt_secret.as_deref().is_none_or(str::is_empty) {
        tracing::info!("No JWT secret configured; tokens are valid for this process only");
    }

    let state = match build_app_state(&config, Arc::new(SystemClock)) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };
    let server = Server::new(state).with_cors_origin(&config.cors_origin);
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
