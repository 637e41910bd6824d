//! Download module.
//!
//! This module provides:
//! - The beatmapset mirror client
//! - The bounded producer/consumer pipeline
//! - Download tallies

pub mod mirror;
pub mod pipeline;
pub mod state;

pub use mirror::MirrorClient;
pub use pipeline::{queue, run_pipeline, Downloader, QueueReceiver, QueueSender};
pub use state::DownloadSummary;
