//! Dependency wiring shared by the binary and the end-to-end tests.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use yagura_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{AuthError, Stage},
    infrastructure::{
        auth::JwtAuthenticator, message_pusher::WebSocketMessagePusher,
        repository::InMemoryStageRepository,
    },
    ui::AppState,
};

/// Initialize dependencies in order:
/// 1. Repository
/// 2. MessagePusher
/// 3. Authenticator
/// 4. UseCases (AppState)
///
/// Fails only when the admin password cannot be hashed.
pub fn build_app_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<AppState, AuthError> {
    let stage = Arc::new(Mutex::new(Stage::new(config.stage_settings())));
    let repository = Arc::new(InMemoryStageRepository::new(stage));

    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    let authenticator = Arc::new(JwtAuthenticator::new(config.jwt_settings()?, clock.clone()));

    Ok(AppState::new(repository, message_pusher, authenticator, clock))
}
