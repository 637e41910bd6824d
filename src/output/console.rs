//! Console output utilities.

use std::path::Path;

use console::style;

use crate::api::Category;
use crate::config::RunMode;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     osu! Beatmap Downloader                           ║
║     Bulk-download beatmapsets from a player profile   ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).magenta());
}

/// Print what is about to be downloaded.
pub fn print_config_summary(
    username: &str,
    mode: RunMode,
    categories: &[Category],
    output_dir: &Path,
) {
    let categories: Vec<&str> = categories.iter().map(|c| c.api_name()).collect();

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  User: {}", username);
    println!("  Mode: {}", mode);
    if !categories.is_empty() {
        println!("  Categories: {}", categories.join(", "));
    }
    println!("  Directory: {}", output_dir.display());
    println!();
}
