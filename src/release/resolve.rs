//! Download URL resolution.
//!
//! The latest asset URL is looked up in the release metadata first. Any
//! problem with that lookup is recoverable: the resolver falls back to the
//! configured redirect URL and records why.

use log::{debug, warn};
use std::fmt;

use crate::config::FetcherConfig;
use crate::release::download::ReleaseClient;
use crate::release::metadata::{MetadataError, ReleaseMetadata};

/// Where a resolved download URL came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UrlSource {
    /// Matched an asset in the release metadata.
    Metadata {
        /// Release tag, when the metadata reported one.
        tag: Option<String>,
    },
    /// The metadata lookup failed or matched nothing.
    Fallback {
        /// A human-readable explanation of why the fallback occurred.
        reason: String,
    },
}

/// A download URL together with its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedUrl {
    /// URL to download the archive from.
    pub url: String,
    /// How the URL was obtained.
    pub source: UrlSource,
}

impl ResolvedUrl {
    /// A URL taken from release metadata.
    #[must_use]
    pub const fn from_metadata(url: String, tag: Option<String>) -> Self {
        Self {
            url,
            source: UrlSource::Metadata { tag },
        }
    }

    /// The fallback URL, annotated with the reason it was needed.
    #[must_use]
    pub fn fallback(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_owned(),
            source: UrlSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// Returns true when the fallback URL was chosen.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, UrlSource::Fallback { .. })
    }
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            UrlSource::Metadata { tag: Some(tag) } => write!(f, "{} (release {tag})", self.url),
            UrlSource::Metadata { tag: None } => write!(f, "{} (latest release)", self.url),
            UrlSource::Fallback { .. } => write!(f, "{} (fallback)", self.url),
        }
    }
}

/// Resolve the archive URL for `config`.
///
/// Never fails: a metadata request error, an unparseable response, or a
/// response without a matching asset all yield the fallback URL.
pub fn resolve_download_url(client: &dyn ReleaseClient, config: &FetcherConfig) -> ResolvedUrl {
    match lookup(client, config) {
        Ok(resolved) => {
            debug!("resolved {resolved}");
            resolved
        }
        Err(reason) => {
            warn!(
                "release metadata unavailable ({reason}); using {}",
                config.fallback_url
            );
            ResolvedUrl::fallback(&config.fallback_url, reason)
        }
    }
}

fn lookup(client: &dyn ReleaseClient, config: &FetcherConfig) -> Result<ResolvedUrl, String> {
    let body = client
        .fetch_metadata(&config.metadata_url)
        .map_err(|e| e.to_string())?;
    let release = ReleaseMetadata::parse(&body).map_err(|e| e.to_string())?;
    let asset = release
        .find_asset(&config.asset_pattern)
        .ok_or_else(|| {
            MetadataError::NoMatch {
                pattern: config.asset_pattern.clone(),
            }
            .to_string()
        })?;
    Ok(ResolvedUrl::from_metadata(
        asset.browser_download_url.clone(),
        release.tag_name.clone(),
    ))
}
