mod http;
mod websocket;

pub use http::{debug_stage, health_check, login, stream_status, verify};
pub use websocket::websocket_handler;
