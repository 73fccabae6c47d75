//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{ModerationPolicy, ParticipantRole, SourceKind};

/// `GET /api/stream-status` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStatusDto {
    pub is_live: bool,
    pub viewer_count: usize,
    /// `null` while idle
    pub source_kind: Option<SourceKind>,
}

/// `POST /api/login` request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequestDto {
    #[serde(default)]
    pub password: String,
}

/// `POST /api/login` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponseDto {
    pub token: String,
    /// RFC 3339 (UTC)
    pub expires_at: String,
}

/// `GET /api/verify` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponseDto {
    pub valid: bool,
    pub role: String,
    /// RFC 3339 (UTC)
    pub expires_at: String,
}

/// Error body for 4xx/5xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
}

/// Participant entry of the debug snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub connection_id: String,
    pub role: ParticipantRole,
    pub authorized: bool,
    /// RFC 3339 (UTC)
    pub connected_at: String,
}

/// Live session entry of the debug snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSessionDto {
    pub broadcaster: String,
    pub media_address: String,
    pub source_kind: SourceKind,
    /// RFC 3339 (UTC)
    pub started_at: String,
}

/// `GET /debug/stage` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSnapshotDto {
    pub is_live: bool,
    pub session: Option<LiveSessionDto>,
    pub viewer_count: usize,
    pub participants: Vec<ParticipantDetailDto>,
    pub chat_history_len: usize,
    pub moderation: ModerationPolicy,
}
