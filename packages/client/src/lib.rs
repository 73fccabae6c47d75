//! CLI client for Yagura: broadcaster, viewer and stream status probe.

pub mod api;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::{ClientOptions, print_stream_status, run_client};
