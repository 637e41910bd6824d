//! Filesystem module.
//!
//! Provides:
//! - Output directory resolution
//! - Filename generation and sanitization

pub mod naming;
pub mod paths;

pub use naming::{beatmapset_filename, sanitize_filename, sanitize_path_component, ARCHIVE_EXTENSION};
pub use paths::{ensure_dir, resolve_output_dir};
