//! Data Transfer Objects (DTOs) for Yagura.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket signaling and chat message DTOs
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
