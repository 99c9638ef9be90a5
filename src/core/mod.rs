// src/core/mod.rs
pub mod ai_client;
pub mod fs_ops;

pub use ai_client::AiClient;
pub use fs_ops::FsOps;
