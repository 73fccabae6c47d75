//! Repository 実装
//!
//! - `inmemory`: プロセス内のメモリに Stage を保持する実装

pub mod inmemory;

pub use inmemory::InMemoryStageRepository;
