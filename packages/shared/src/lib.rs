//! Utilities shared by the Yagura server and client.

pub mod logger;
pub mod time;
