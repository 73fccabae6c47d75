//! Yagura server library.
//!
//! Signaling and chat coordinator for single-broadcaster live streaming: tracks whether a
//! stream is live, who broadcasts it, how many viewers watch, and relays the media
//! handshake from each viewer to the broadcaster.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod app;
pub mod config;
