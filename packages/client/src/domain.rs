//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use std::time::Duration;

use yagura_server::{domain::SourceKind, infrastructure::dto::websocket::ClientMessage};

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// Credentials do not get better by retrying, so `Unauthorized` is fatal.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Unauthorized(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Schedule for re-sending a viewer's `ready` after `stream-started`
///
/// The broadcaster side may not be listening yet when the first `ready` arrives,
/// so the viewer repeats it a bounded number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyRetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReadyRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(2),
        }
    }
}

impl ReadyRetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// How long to wait before sending attempt `attempt` (0-indexed).
    ///
    /// The first attempt goes out immediately. `None` once the attempts are used up.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        match attempt {
            a if a >= self.max_attempts => None,
            0 => Some(Duration::ZERO),
            _ => Some(self.interval),
        }
    }
}

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Chat(String),
    Start,
    Stop,
    Delete(i64),
    /// `/something` that is not a known command, or a command with bad arguments
    Invalid(String),
}

/// Parse a prompt line. Lines not starting with `/` are chat.
pub fn parse_input(line: &str) -> InputCommand {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return InputCommand::Chat(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("start"), None, _) => InputCommand::Start,
        (Some("stop"), None, _) => InputCommand::Stop,
        (Some("delete"), Some(id), None) => match id.parse::<i64>() {
            Ok(id) => InputCommand::Delete(id),
            Err(_) => InputCommand::Invalid(format!("invalid message id '{}'", id)),
        },
        (Some("delete"), _, _) => InputCommand::Invalid("usage: /delete <message-id>".to_string()),
        _ => InputCommand::Invalid(format!("unknown command '{}'", line)),
    }
}

/// What this client does on the stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRole {
    Broadcaster {
        user: String,
        media_address: String,
        source_kind: SourceKind,
    },
    Viewer {
        user: String,
        media_address: String,
        ready_policy: ReadyRetryPolicy,
    },
}

impl SessionRole {
    pub fn user(&self) -> &str {
        match self {
            SessionRole::Broadcaster { user, .. } | SessionRole::Viewer { user, .. } => user,
        }
    }

    /// Frames sent right after every (re)connect
    pub fn opening_messages(&self) -> Vec<ClientMessage> {
        match self {
            SessionRole::Broadcaster { .. } => vec![self.start_stream()],
            SessionRole::Viewer { .. } => vec![ClientMessage::Join],
        }
    }

    /// Turn a prompt command into the frame to send, or a notice for the user
    pub fn message_for(&self, command: InputCommand) -> Result<ClientMessage, String> {
        match (command, self) {
            (InputCommand::Chat(text), _) => Ok(ClientMessage::ChatPost {
                user: self.user().to_string(),
                text,
            }),
            (InputCommand::Delete(message_id), _) => Ok(ClientMessage::ChatDelete { message_id }),
            (InputCommand::Start, SessionRole::Broadcaster { .. }) => Ok(self.start_stream()),
            (InputCommand::Stop, SessionRole::Broadcaster { .. }) => Ok(ClientMessage::StopStream),
            (InputCommand::Start | InputCommand::Stop, SessionRole::Viewer { .. }) => {
                Err("only the broadcaster can start or stop the stream".to_string())
            }
            (InputCommand::Invalid(reason), _) => Err(reason),
        }
    }

    fn start_stream(&self) -> ClientMessage {
        match self {
            SessionRole::Broadcaster {
                media_address,
                source_kind,
                ..
            } => ClientMessage::StartStream {
                media_address: media_address.clone(),
                source_kind: source_kind.to_string(),
            },
            SessionRole::Viewer { .. } => ClientMessage::Join,
        }
    }
}

/// Build the WebSocket endpoint from the HTTP base URL of the server
///
/// `http://host:8080` becomes `ws://host:8080/ws`, `https` becomes `wss`.
pub fn websocket_url(server: &str, token: Option<&str>) -> String {
    let base = server.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        format!("ws://{}", base)
    };

    match token {
        Some(token) => format!("{}/ws?token={}", base, token),
        None => format!("{}/ws", base),
    }
}

/// Join an HTTP API path onto the server base URL
pub fn api_url(server: &str, path: &str) -> String {
    format!("{}{}", server.trim_end_matches('/'), path)
}
