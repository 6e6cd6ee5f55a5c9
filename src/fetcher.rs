//! Fetch pipeline: resolve, download, extract, list.
//!
//! The steps run strictly in sequence and the first failure aborts the run.
//! Only the metadata lookup is recoverable; it falls back to the configured
//! redirect URL (see [`crate::release::resolve`]). The downloaded archive
//! lives in a temporary file inside the target directory and is removed once
//! extraction succeeds, or when any step fails.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::Write;
use std::path::Path;

use crate::config::FetcherConfig;
use crate::error::{FetchError, Result};
use crate::listing::{ListedEntry, list_directory};
use crate::output::write_stderr_line;
use crate::release::download::{DownloadError, HttpClient, ReleaseClient};
use crate::release::extraction::{ArchiveExtractor, ZipExtractor};
use crate::release::resolve::{ResolvedUrl, UrlSource, resolve_download_url};

/// Prefix of the temporary archive written into the target directory.
pub const ARCHIVE_PREFIX: &str = ".webui-";

/// Suffix of the temporary archive written into the target directory.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Parameters for a single fetch.
#[derive(Debug)]
pub struct FetchRequest<'a> {
    /// Effective configuration.
    pub config: &'a FetcherConfig,
    /// When true, suppress progress output.
    pub quiet: bool,
}

/// What a successful fetch produced.
#[derive(Debug)]
pub struct FetchReport {
    /// Directory the archive was extracted into.
    pub target_dir: Utf8PathBuf,
    /// URL the archive was downloaded from.
    pub resolved: ResolvedUrl,
    /// Archive entries written, in archive order.
    pub extracted: Vec<String>,
    /// Contents of the target directory after extraction.
    pub listing: Vec<ListedEntry>,
}

/// Run the fetch with the production HTTP client and zip extractor.
///
/// # Errors
///
/// Returns an error if the target directory cannot be created, the download
/// fails, or extraction fails. Metadata lookup failures are not errors.
pub fn fetch(request: &FetchRequest<'_>, stderr: &mut dyn Write) -> Result<FetchReport> {
    let client = HttpClient::new(request.config.timeout());
    fetch_with(request, &client, &ZipExtractor, stderr)
}

/// Testable inner function with injected dependencies.
///
/// The production entry point [`fetch`] delegates here with real
/// implementations; tests inject mocks.
///
/// # Errors
///
/// See [`fetch`].
pub fn fetch_with(
    request: &FetchRequest<'_>,
    client: &dyn ReleaseClient,
    extractor: &dyn ArchiveExtractor,
    stderr: &mut dyn Write,
) -> Result<FetchReport> {
    let config = request.config;
    let target_dir = config.target_dir.as_path();

    // Step 1: Ensure the target directory exists.
    ensure_target_dir(target_dir)?;

    // Step 2: Resolve the download URL, falling back when metadata is unusable.
    progress(request, stderr, "Resolving latest release...");
    let resolved = resolve_download_url(client, config);
    if let UrlSource::Fallback { reason } = &resolved.source {
        progress(
            request,
            stderr,
            format!("Release metadata unavailable: {reason}"),
        );
    }

    // Step 3: Download into a temporary file next to the extracted assets.
    progress(request, stderr, format!("Downloading {resolved}..."));
    let archive = tempfile::Builder::new()
        .prefix(ARCHIVE_PREFIX)
        .suffix(ARCHIVE_SUFFIX)
        .tempfile_in(target_dir)
        .map_err(|e| FetchError::Download(DownloadError::Io(e)))?;
    client.download_to(&resolved.url, archive.path())?;
    verify_archive(archive.path())?;

    // Step 4: Extract over the existing contents.
    progress(request, stderr, format!("Extracting into {target_dir}..."));
    let extracted = extractor.extract(archive.path(), target_dir.as_std_path())?;

    // Step 5: Remove the archive and list what is left.
    let archive_path = utf8_path(archive.path())?;
    archive.close().map_err(|e| FetchError::Cleanup {
        path: archive_path,
        source: e,
    })?;
    let listing = list_directory(target_dir.as_std_path()).map_err(|e| FetchError::Listing {
        path: target_dir.to_owned(),
        source: e,
    })?;
    debug!(
        "extracted {} entries; {} top-level entries in {target_dir}",
        extracted.len(),
        listing.len()
    );

    Ok(FetchReport {
        target_dir: target_dir.to_owned(),
        resolved,
        extracted,
        listing,
    })
}

/// Create the target directory and any missing parents.
fn ensure_target_dir(target_dir: &Utf8Path) -> Result<()> {
    std::fs::create_dir_all(target_dir).map_err(|e| FetchError::TargetDir {
        path: target_dir.to_owned(),
        source: e,
    })
}

/// Check that the transfer left a non-empty archive behind.
fn verify_archive(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.len() > 0 => Ok(()),
        Ok(_) => Err(FetchError::ArchiveEmpty {
            path: utf8_path(path)?,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::ArchiveMissing {
            path: utf8_path(path)?,
        }),
        Err(e) => Err(FetchError::Download(DownloadError::Io(e))),
    }
}

fn utf8_path(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path.to_path_buf()).map_err(|e| FetchError::NonUtf8Path {
        path: e.into_path_buf().display().to_string(),
    })
}

fn progress(request: &FetchRequest<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !request.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
