//! Message formatting utilities for client display.

use yagura_server::infrastructure::dto::{
    http::StreamStatusDto,
    websocket::{ChatMessagePayload, ServerMessage},
};
use yagura_shared::time::timestamp_to_clock_time;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any server frame for the terminal
    pub fn format_server_message(message: &ServerMessage) -> String {
        match message {
            ServerMessage::Welcome {
                connection_id,
                authorized,
            } => Self::format_welcome(connection_id, *authorized),
            ServerMessage::ChatHistory { messages } => Self::format_chat_history(messages),
            ServerMessage::StreamStarted {
                media_address,
                source_kind,
            } => format!(
                "\n▶ Stream started ({}) at media address {}\n",
                source_kind, media_address
            ),
            ServerMessage::StreamStopped => "\n■ Stream stopped\n".to_string(),
            ServerMessage::ViewerCount { count } => Self::format_viewer_count(*count),
            ServerMessage::ViewerHandshake {
                viewer_media_address,
            } => format!("\n⇄ Viewer ready at {}\n", viewer_media_address),
            ServerMessage::ChatMessage(payload) => Self::format_chat_message(payload),
            ServerMessage::ChatDeleted { message_id } => {
                format!("\n✕ Message #{} was deleted\n", message_id)
            }
            ServerMessage::Error { code, message } => {
                format!("\n! Server error ({:?}): {}\n", code, message)
            }
        }
    }

    /// Format the welcome banner
    pub fn format_welcome(connection_id: &str, authorized: bool) -> String {
        let role = if authorized { "broadcaster" } else { "viewer" };
        format!(
            "\n{}\nConnected as {} ({})\n{}\n",
            RULE, connection_id, role, RULE
        )
    }

    /// Format the chat history replayed after connecting
    pub fn format_chat_history(messages: &[ChatMessagePayload]) -> String {
        let mut output = String::new();
        output.push_str("\nRecent chat:\n");

        if messages.is_empty() {
            output.push_str("(No messages)\n");
        } else {
            for message in messages {
                output.push_str(&Self::format_chat_line(message));
                output.push('\n');
            }
        }

        output
    }

    /// Format a live chat message
    pub fn format_chat_message(message: &ChatMessagePayload) -> String {
        format!("\n{}\n", Self::format_chat_line(message))
    }

    /// `[HH:MM:SS] #id @user: text`
    fn format_chat_line(message: &ChatMessagePayload) -> String {
        let user = if message.user.is_empty() {
            "anonymous"
        } else {
            message.user.as_str()
        };
        format!(
            "[{}] #{} @{}: {}",
            timestamp_to_clock_time(message.sent_at),
            message.message_id,
            user,
            message.text
        )
    }

    pub fn format_viewer_count(count: usize) -> String {
        let noun = if count == 1 { "viewer" } else { "viewers" };
        format!("\n👥 {} {} watching\n", count, noun)
    }

    /// Format the `status` command output
    pub fn format_stream_status(status: &StreamStatusDto) -> String {
        match status.source_kind {
            Some(source_kind) if status.is_live => format!(
                "LIVE ({}) - {} viewer(s)",
                source_kind, status.viewer_count
            ),
            _ => format!("OFFLINE - {} viewer(s)", status.viewer_count),
        }
    }

    /// Format a notice produced locally (bad command, etc.)
    pub fn format_notice(text: &str) -> String {
        format!("\n* {}\n", text)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
