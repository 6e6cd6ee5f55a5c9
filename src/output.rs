//! Output formatting for the fetcher CLI.
//!
//! Progress and errors are written to stderr; the final directory listing is
//! written to stdout so it can be piped.

use camino::Utf8Path;
use std::io::Write;

use crate::config::FetcherConfig;
use crate::listing::ListedEntry;

/// Write a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after extraction.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use webui_fetcher::output::success_message;
///
/// let message = success_message(1, Utf8Path::new("/srv/ui"));
/// assert_eq!(message, "Extracted 1 entry to /srv/ui");
/// ```
#[must_use]
pub fn success_message(count: usize, target_dir: &Utf8Path) -> String {
    let plural = if count == 1 { "entry" } else { "entries" };
    format!("Extracted {count} {plural} to {target_dir}")
}

/// Render a directory listing, one entry per line.
///
/// Directories carry a trailing `/`; files show their size in bytes.
#[must_use]
pub fn format_listing(target_dir: &Utf8Path, entries: &[ListedEntry]) -> String {
    let mut lines = vec![format!("Contents of {target_dir}:")];
    if entries.is_empty() {
        lines.push("  (empty)".to_owned());
    }
    let width = entries
        .iter()
        .filter(|entry| !entry.is_dir())
        .map(|entry| entry.size.to_string().len())
        .max()
        .unwrap_or(0);
    for entry in entries {
        if entry.is_dir() {
            lines.push(format!("  {:>width$}  {}/", "-", entry.name));
        } else {
            lines.push(format!("  {:>width$}  {}", entry.size, entry.name));
        }
    }
    lines.join("\n")
}

/// Configuration summary for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The effective configuration.
    pub config: &'a FetcherConfig,
    /// Configuration file in use, if any.
    pub config_file: Option<&'a Utf8Path>,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let config_file = self
            .config_file
            .map_or_else(|| "(defaults)".to_owned(), ToString::to_string);
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Config file: {config_file}"),
            format!("Target directory: {}", self.config.target_dir),
            format!("Metadata URL: {}", self.config.metadata_url),
            format!("Asset pattern: {}", self.config.asset_pattern),
            format!("Fallback URL: {}", self.config.fallback_url),
            format!("Timeout: {}s", self.config.timeout_secs),
        ]
        .join("\n")
    }
}
