//! HTTP access to the release host.
//!
//! Provides a trait-based abstraction over the two requests the fetcher
//! makes, so the pipeline can be exercised in tests without network access.

use log::debug;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// `Accept` header value for the release-metadata API.
const METADATA_ACCEPT: &str = "application/vnd.github+json";

/// Trait for talking to the release host.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use webui_fetcher::release::download::HttpClient;
///
/// let client = HttpClient::new(Duration::from_secs(30));
/// // Use client.fetch_metadata(url) and client.download_to(url, dest) in production
/// # let _ = client;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseClient {
    /// Fetch the release-metadata document at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be read.
    fn fetch_metadata(&self, url: &str) -> Result<String, DownloadError>;

    /// Download `url` and write the body to `dest`, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer or the file write fails.
    fn download_to(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from HTTP transfers.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Release client backed by `ureq`.
#[derive(Debug)]
pub struct HttpClient {
    timeout: Duration,
}

impl HttpClient {
    /// Create a client bounded by `timeout`.
    ///
    /// Metadata requests must complete within `timeout`. Archive downloads
    /// must connect and receive their response head within `timeout`; the
    /// body transfer itself is not capped.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ReleaseClient for HttpClient {
    fn fetch_metadata(&self, url: &str) -> Result<String, DownloadError> {
        debug!("querying release metadata at {url}");
        let response = http_agent()
            .get(url)
            .header("Accept", METADATA_ACCEPT)
            .config()
            .timeout_global(Some(self.timeout))
            .build()
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        debug!("downloading {url} to {}", dest.display());
        // The archive body is unbounded: only connecting and waiting for the
        // response head count against the timeout.
        let response = http_agent()
            .get(url)
            .config()
            .timeout_connect(Some(self.timeout))
            .timeout_recv_response(Some(self.timeout))
            .build()
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        let written = std::io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(DownloadError::Io)?;
        debug!("wrote {written} bytes to {}", dest.display());
        Ok(())
    }
}

/// Shared `ureq` agent.
///
/// Timeouts are applied per request, so one agent serves every client.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .user_agent(concat!("webui-fetcher/", env!("CARGO_PKG_VERSION")))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
