//! Run summaries.

use std::collections::BTreeMap;

use console::style;

use crate::collect::UserFavourites;
use crate::download::DownloadSummary;

/// One-line summary, e.g. `"Downloaded 8/10 beatmapsets (2 failed)"`.
pub fn format_summary(summary: &DownloadSummary) -> String {
    let mut line = format!(
        "Downloaded {}/{} beatmapsets",
        summary.downloaded,
        summary.total()
    );
    if summary.failed_count() > 0 {
        line.push_str(&format!(" ({} failed)", summary.failed_count()));
    }
    line
}

/// Print the final tally and any beatmapsets that need manual download.
pub fn print_summary(summary: &DownloadSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style(format_summary(summary)).bold());

    if !summary.failed.is_empty() {
        println!(
            "  {}",
            style("These beatmapsets failed, please download them manually:").yellow()
        );
        for id in &summary.failed {
            println!("    https://osu.ppy.sh/beatmapsets/{}", id);
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Print how many favourites each visited user contributed.
pub fn print_collection_stats(visited: &BTreeMap<u64, UserFavourites>, unique: usize) {
    println!();
    println!("{}", style("Collected favourites:").bold());
    for entry in visited.values() {
        println!(
            "  {} (depth {}): {}",
            entry.user.username,
            entry.depth,
            entry.favourites.len()
        );
    }
    println!(
        "  Unique beatmapsets: {}",
        style(unique).green()
    );
}
