//! Fetcher configuration.
//!
//! The fetcher runs without arguments against fixed defaults. A TOML file can
//! override individual fields, and the command line can override the target
//! directory on top of that. Fields omitted from the file keep their defaults.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;

/// Directory the web UI is unpacked into.
pub const DEFAULT_TARGET_DIR: &str = "/opt/rompi/vuetorrent";

/// Release-metadata endpoint for the most recent published release.
pub const DEFAULT_METADATA_URL: &str =
    "https://api.github.com/repos/VueTorrent/VueTorrent/releases/latest";

/// Substring identifying the release asset to download.
pub const DEFAULT_ASSET_PATTERN: &str = "vuetorrent.zip";

/// Redirect URL that always serves the latest asset.
pub const DEFAULT_FALLBACK_URL: &str =
    "https://github.com/VueTorrent/VueTorrent/releases/latest/download/vuetorrent.zip";

/// Network timeout applied to each request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or contains unknown keys.
    #[error("invalid config {path}: {reason}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Settings for a single fetch.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetcherConfig {
    /// Directory the archive is downloaded into and extracted in.
    pub target_dir: Utf8PathBuf,
    /// Endpoint returning the latest release as JSON.
    pub metadata_url: String,
    /// Substring an asset download URL must contain to be selected.
    pub asset_pattern: String,
    /// URL used when the metadata lookup fails or matches nothing.
    pub fallback_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            target_dir: Utf8PathBuf::from(DEFAULT_TARGET_DIR),
            metadata_url: DEFAULT_METADATA_URL.to_owned(),
            asset_pattern: DEFAULT_ASSET_PATTERN.to_owned(),
            fallback_url: DEFAULT_FALLBACK_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FetcherConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use webui_fetcher::config::{FetcherConfig, DEFAULT_ASSET_PATTERN};
    ///
    /// let config = FetcherConfig::from_toml_str("target_dir = \"/srv/ui\"", "inline".into())
    ///     .expect("valid config");
    /// assert_eq!(config.target_dir, "/srv/ui");
    /// assert_eq!(config.asset_pattern, DEFAULT_ASSET_PATTERN);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or
    /// names a key this type does not know.
    pub fn from_toml_str(contents: &str, origin: Utf8PathBuf) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: origin,
            reason: e.message().to_owned(),
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_owned(),
            source: e,
        })?;
        Self::from_toml_str(&contents, path.to_owned())
    }

    /// Return a copy with the target directory replaced when `dir` is set.
    #[must_use]
    pub fn with_target_dir(mut self, dir: Option<Utf8PathBuf>) -> Self {
        if let Some(target_dir) = dir {
            self.target_dir = target_dir;
        }
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
