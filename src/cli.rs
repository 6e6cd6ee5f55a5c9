//! CLI argument definitions for the web UI fetcher.
//!
//! Every flag is optional: running the binary without arguments fetches the
//! latest release into the default target directory.

use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

use crate::config::{ConfigError, FetcherConfig};

/// Fetch the latest web UI release and unpack it for static serving.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "webui-fetcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch the latest web UI release and unpack it for static serving.\n\n",
    "The latest release is looked up through the release-metadata API. When ",
    "the lookup fails or no asset matches, the well-known \"latest\" download ",
    "URL is used instead. The archive is downloaded into the target directory, ",
    "extracted over any existing files, and then removed.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Fetch into the default directory:\n",
    "    $ webui-fetcher\n\n",
    "  Fetch into another directory:\n",
    "    $ webui-fetcher --target-dir /srv/webui\n\n",
    "  Preview the effective settings:\n",
    "    $ webui-fetcher --config fetcher.toml --dry-run",
))]
pub struct Cli {
    /// Directory to unpack the web UI into [default: /opt/rompi/vuetorrent].
    #[arg(short, long, value_name = "DIR")]
    pub target_dir: Option<Utf8PathBuf>,

    /// TOML file overriding the built-in settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Show the effective settings and exit without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors and the final listing still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Build the effective configuration.
    ///
    /// Starts from the built-in defaults, applies the configuration file when
    /// one was given, then applies `--target-dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use webui_fetcher::cli::Cli;
    /// use webui_fetcher::config::FetcherConfig;
    ///
    /// let cli = Cli::default();
    /// let config = cli.effective_config().expect("defaults always load");
    /// assert_eq!(config, FetcherConfig::default());
    /// ```
    pub fn effective_config(&self) -> Result<FetcherConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => FetcherConfig::load(path)?,
            None => FetcherConfig::default(),
        };
        Ok(base.with_target_dir(self.target_dir.clone()))
    }

    /// Log level selected by `-v`/`-q`.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
