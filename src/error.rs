//! Error types for the web UI fetcher.
//!
//! Metadata lookups never surface here: a failed lookup is recovered by the
//! resolver, which falls back to the well-known download URL. Every variant of
//! [`FetchError`] is fatal and maps to a non-zero exit status.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::release::download::DownloadError;
use crate::release::extraction::ExtractionError;

/// Errors that abort a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The target directory could not be created.
    #[error("cannot create target directory {path}: {source}")]
    TargetDir {
        /// Directory that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The archive transfer failed.
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    /// The transfer reported success but no archive was written.
    #[error("download failed: archive {path} is missing")]
    ArchiveMissing {
        /// Where the archive was expected.
        path: Utf8PathBuf,
    },

    /// The transfer reported success but the archive is empty.
    #[error("download failed: archive {path} is empty")]
    ArchiveEmpty {
        /// Path of the empty archive.
        path: Utf8PathBuf,
    },

    /// The archive could not be unpacked.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The downloaded archive could not be removed after extraction.
    #[error("failed to remove archive {path}: {source}")]
    Cleanup {
        /// Path of the archive left behind.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The target directory could not be listed after extraction.
    #[error("failed to list {path}: {source}")]
    Listing {
        /// Directory that was being listed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Process exit status for this error.
    ///
    /// All fatal errors share status 1; success is 0.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Returns true when the failure happened before anything was extracted.
    #[must_use]
    pub const fn is_download_failure(&self) -> bool {
        matches!(
            self,
            Self::Download(_) | Self::ArchiveMissing { .. } | Self::ArchiveEmpty { .. }
        )
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
