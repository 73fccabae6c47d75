//! Conversion logic between domain models and DTOs.

use yagura_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, LiveStream, Participant, Stage, StageEvent, StreamStatus};
use crate::infrastructure::dto::{
    http::{LiveSessionDto, ParticipantDetailDto, StageSnapshotDto, StreamStatusDto},
    websocket::{ChatMessagePayload, ServerMessage},
};

// ========================================
// Domain Event → WebSocket DTO
// ========================================

impl From<ChatMessage> for ChatMessagePayload {
    fn from(model: ChatMessage) -> Self {
        Self {
            user: model.user.into_string(),
            text: model.text.into_string(),
            message_id: model.id.value(),
            sent_at: model.sent_at.value(),
        }
    }
}

impl From<StageEvent> for ServerMessage {
    fn from(event: StageEvent) -> Self {
        match event {
            StageEvent::Welcome {
                connection_id,
                authorized,
            } => ServerMessage::Welcome {
                connection_id: connection_id.into_string(),
                authorized,
            },
            StageEvent::ChatHistory(messages) => ServerMessage::ChatHistory {
                messages: messages.into_iter().map(ChatMessagePayload::from).collect(),
            },
            StageEvent::StreamStarted {
                media_address,
                source_kind,
            } => ServerMessage::StreamStarted {
                media_address: media_address.into_string(),
                source_kind,
            },
            StageEvent::StreamStopped => ServerMessage::StreamStopped,
            StageEvent::ViewerCount(count) => ServerMessage::ViewerCount { count },
            StageEvent::ViewerHandshake {
                viewer_media_address,
            } => ServerMessage::ViewerHandshake {
                viewer_media_address: viewer_media_address.into_string(),
            },
            StageEvent::ChatMessage(message) => ServerMessage::ChatMessage(message.into()),
            StageEvent::ChatDeleted(message_id) => ServerMessage::ChatDeleted {
                message_id: message_id.value(),
            },
        }
    }
}

// ========================================
// Domain Model → HTTP DTO
// ========================================

impl From<StreamStatus> for StreamStatusDto {
    fn from(status: StreamStatus) -> Self {
        Self {
            is_live: status.is_live,
            viewer_count: status.viewer_count,
            source_kind: status.source_kind,
        }
    }
}

impl From<Participant> for ParticipantDetailDto {
    fn from(model: Participant) -> Self {
        Self {
            connection_id: model.id.into_string(),
            role: model.role,
            authorized: model.authorized,
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

impl From<&LiveStream> for LiveSessionDto {
    fn from(live: &LiveStream) -> Self {
        Self {
            broadcaster: live.broadcaster.as_str().to_string(),
            media_address: live.media_address.as_str().to_string(),
            source_kind: live.source_kind,
            started_at: timestamp_to_rfc3339(live.started_at.value()),
        }
    }
}

impl From<&Stage> for StageSnapshotDto {
    fn from(stage: &Stage) -> Self {
        Self {
            is_live: stage.session().is_live(),
            session: stage.session().live().map(LiveSessionDto::from),
            viewer_count: stage.viewers().len(),
            participants: stage
                .registry()
                .participants()
                .into_iter()
                .map(ParticipantDetailDto::from)
                .collect(),
            chat_history_len: stage.chat().len(),
            moderation: stage.moderation(),
        }
    }
}
