//! osu! Beatmap Downloader - bulk download of osu! beatmapsets
//!
//! This library gathers beatmapsets from an osu! player's profile through the
//! osu! API v2 and downloads their archives from a public mirror.
//!
//! # Features
//!
//! - Favourite, ranked, loved, pending, graveyard and most played beatmapsets
//! - Beatmapsets of top scores and first places, per gamemode
//! - Recursive favourites across the creators of favourited maps
//! - Deduplication across categories and users
//! - Concurrent listing and throttled downloading over a bounded queue
//! - OAuth token caching between runs
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use osu_beatmap_downloader::{
//!     build_http_client, Aggregator, Category, Config, OsuApi, PagePolicy,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = OsuApi::from_config(build_http_client(&config)?, &config)?;
//!
//!     let user = api.get_user(2).await?;
//!     let aggregator = Aggregator::new(&api, PagePolicy::Declared);
//!     let favourites = aggregator
//!         .aggregate(
//!             user.id,
//!             &[Category::Favourite],
//!             &user.declared_counts(),
//!             config.options.gamemode,
//!         )
//!         .await?;
//!
//!     println!("{} favourites", favourites.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod collect;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;

// Re-exports for convenience
pub use api::{build_http_client, Beatmapset, BeatmapsetSource, Category, OsuApi, User};
pub use collect::{AggregationResult, Aggregator, PagePolicy, Walker};
pub use config::{Config, Gamemode};
pub use download::{run_pipeline, DownloadSummary, Downloader, MirrorClient};
pub use error::{Error, Result};
