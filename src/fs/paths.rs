//! Output directory management.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;

/// Folder, relative to the working directory, that default outputs go under.
pub const DEFAULT_OUTPUT_ROOT: &str = "beatmaps";

/// Resolve the directory beatmapsets are written to.
///
/// An explicitly configured directory must already exist. Otherwise
/// `{base}/beatmaps/{username}` is created.
pub fn resolve_output_dir(
    configured: Option<&Path>,
    base: &Path,
    username: &str,
) -> Result<PathBuf> {
    if let Some(dir) = configured {
        if !dir.is_dir() {
            return Err(Error::ConfigValidation {
                field: "output_directory".to_string(),
                message: format!("Output folder does not exist: {}", dir.display()),
            });
        }
        return Ok(dir.to_path_buf());
    }

    let dir = base
        .join(DEFAULT_OUTPUT_ROOT)
        .join(sanitize_path_component(username)?);
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
