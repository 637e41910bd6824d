//! Configuration module for the osu-beatmap-downloader.
//!
//! This module handles:
//! - Loading and saving the TOML configuration file
//! - Caching the OAuth access token between runs
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    CacheConfig, Config, CredentialsConfig, OptionsConfig, DEFAULT_API_BASE_URL,
    DEFAULT_MIRROR_URL, DEFAULT_TOKEN_URL,
};
pub use modes::{Gamemode, RunMode};
pub use validation::{
    validate_categories, validate_config, validate_credentials, validate_depth, validate_user_id,
};
