//! Zip extraction for downloaded release archives.
//!
//! Unpacks into an existing directory, replacing files that are already
//! present. Entry paths are validated before anything is written to guard
//! against zip-slip.

use log::{debug, trace};
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting release archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use webui_fetcher::release::extraction::ZipExtractor;
///
/// let extractor = ZipExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// # let _ = extractor;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the entry paths that were written, in archive order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry
    /// attempts to escape the destination directory.
    /// Returns [`ExtractionError::EmptyArchive`] if the archive has no entries.
    /// Returns [`ExtractionError::InvalidArchive`] if the file is not a zip.
    /// Returns [`ExtractionError::Io`] on I/O failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path)
    -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be read as a zip archive.
    #[error("invalid zip archive: {reason}")]
    InvalidArchive {
        /// Reader message.
        reason: String,
    },

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no entries.
    #[error("archive contains no files")]
    EmptyArchive,
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive {
                reason: other.to_string(),
            },
        }
    }
}

/// Default extractor using the `zip` crate.
///
/// Existing files at an entry's destination are truncated and rewritten.
/// Symlink entries are skipped.
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let file = File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
        if archive.is_empty() {
            return Err(ExtractionError::EmptyArchive);
        }

        let mut extracted = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let entry_path = PathBuf::from(entry.name());

            validate_entry_path(&entry_path)?;
            if entry.is_symlink() {
                debug!("skipping symlink entry {}", entry.name());
                continue;
            }

            let dest_path = dest_dir.join(&entry_path);
            if entry.is_dir() {
                std::fs::create_dir_all(&dest_path)?;
            } else {
                if let Some(parent) = dest_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut out = File::create(&dest_path)?;
                std::io::copy(&mut entry, &mut out)?;
            }
            trace!("extracted {}", dest_path.display());

            extracted.push(entry.name().to_owned());
        }

        Ok(extracted)
    }
}

/// Validate that an entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
