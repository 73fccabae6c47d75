//! WebSocket message DTOs.
//!
//! Every frame is a JSON object with a kebab-case `type` tag and snake_case fields.

use serde::{Deserialize, Serialize};

use crate::domain::SourceKind;

/// Messages sent by clients (broadcaster or viewer) to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    StartStream {
        media_address: String,
        source_kind: String,
    },
    StopStream,
    Join,
    Ready {
        viewer_media_address: String,
    },
    ChatPost {
        #[serde(default)]
        user: String,
        text: String,
    },
    ChatDelete {
        message_id: i64,
    },
}

/// Chat message payload (shared by `chat-message` and `chat-history`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub user: String,
    pub text: String,
    pub message_id: i64,
    /// Unix timestamp in UTC (milliseconds)
    pub sent_at: i64,
}

/// Error codes carried by `error` messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// The caller is not allowed to perform the action
    Unauthorized,
    /// The frame could not be parsed
    Malformed,
    /// The frame was parsed but a field failed validation
    InvalidPayload,
}

/// Messages sent by the server to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome {
        connection_id: String,
        authorized: bool,
    },
    ChatHistory {
        messages: Vec<ChatMessagePayload>,
    },
    StreamStarted {
        media_address: String,
        source_kind: SourceKind,
    },
    StreamStopped,
    ViewerCount {
        count: usize,
    },
    ViewerHandshake {
        viewer_media_address: String,
    },
    ChatMessage(ChatMessagePayload),
    ChatDeleted {
        message_id: i64,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code,
            message: message.into(),
        }
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
