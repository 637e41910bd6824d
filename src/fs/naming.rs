//! Filename generation and sanitization.

use crate::api::Beatmapset;
use crate::error::{Error, Result};

/// Extension used for beatmapset archives.
pub const ARCHIVE_EXTENSION: &str = "osz";

/// Longest file name, in bytes, most filesystems accept.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Characters that are illegal in file names on at least one major platform.
fn is_illegal(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Strip characters that are illegal in file names.
///
/// Returns an error if nothing usable is left.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let stripped: String = name.chars().filter(|&c| !is_illegal(c)).collect();
    let sanitized = stripped.trim();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return Err(Error::InvalidFilename(format!(
            "Nothing left of '{}' after sanitizing",
            name.escape_debug()
        )));
    }

    Ok(sanitized.to_string())
}

/// Sanitize a single directory name, replacing rather than dropping separators.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| if is_illegal(c) { '_' } else { c })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// File name a beatmapset archive is saved under.
///
/// `"{id} {artist} - {title}.osz"`, or `"{id}.osz"` when the listing carried
/// no metadata. Long names are cut so the result fits in
/// [`MAX_FILENAME_BYTES`]; the id prefix always survives.
pub fn beatmapset_filename(set: &Beatmapset) -> Result<String> {
    let stem = if set.artist.is_empty() && set.title.is_empty() {
        set.id.to_string()
    } else {
        format!("{} {} - {}", set.id, set.artist, set.title)
    };

    let stem = sanitize_filename(&stem)?;
    let max_stem = MAX_FILENAME_BYTES - ARCHIVE_EXTENSION.len() - 1;
    let stem = truncate_at_char_boundary(&stem, max_stem).trim_end();

    Ok(format!("{}.{}", stem, ARCHIVE_EXTENSION))
}

/// Longest prefix of `s` that is at most `max_bytes` long.
fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
