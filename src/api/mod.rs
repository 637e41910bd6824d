//! osu! API module.
//!
//! This module provides:
//! - HTTP client for the osu! API v2
//! - OAuth client-credentials session handling
//! - Category dispatch (endpoint and response shape)
//! - API response types

pub mod auth;
pub mod category;
pub mod client;
pub mod types;

pub use auth::{CachedToken, Session};
pub use category::{Category, Endpoint, Envelope};
pub use client::{build_http_client, BeatmapsetSource, OsuApi, PAGE_SIZE};
pub use types::*;
