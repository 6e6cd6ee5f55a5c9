//! Release-metadata model and asset selection.
//!
//! Only the fields the fetcher reads are modelled; everything else in the
//! hosting API's response is ignored.

use serde::Deserialize;

/// A downloadable file attached to a release.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ReleaseAsset {
    /// File name as published.
    pub name: String,
    /// Direct download URL for the file.
    pub browser_download_url: String,
}

/// The latest published release. Does not contain all fields.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ReleaseMetadata {
    /// Tag the release was cut from, when reported.
    #[serde(default)]
    pub tag_name: Option<String>,
    /// Files attached to the release.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Errors raised while interpreting a metadata response.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The body is not a release document.
    #[error("malformed release metadata: {reason}")]
    Malformed {
        /// Parser message.
        reason: String,
    },

    /// No asset URL contains the requested pattern.
    #[error("no release asset matches \"{pattern}\"")]
    NoMatch {
        /// Pattern that was searched for.
        pattern: String,
    },
}

impl ReleaseMetadata {
    /// Parse a metadata response body.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Malformed`] when `body` is not release JSON.
    pub fn parse(body: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(body).map_err(|e| MetadataError::Malformed {
            reason: e.to_string(),
        })
    }

    /// First asset whose download URL contains `pattern`.
    ///
    /// Assets are searched in response order and the first hit wins. An empty
    /// pattern matches nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use webui_fetcher::release::metadata::ReleaseMetadata;
    ///
    /// let body = r#"{"tag_name":"v2.0.0","assets":[
    ///     {"name":"vuetorrent.zip","browser_download_url":"https://dl.example/v2.0.0/vuetorrent.zip"}
    /// ]}"#;
    /// let release = ReleaseMetadata::parse(body).expect("valid metadata");
    /// let asset = release.find_asset("vuetorrent.zip").expect("asset present");
    /// assert_eq!(asset.name, "vuetorrent.zip");
    /// ```
    #[must_use]
    pub fn find_asset(&self, pattern: &str) -> Option<&ReleaseAsset> {
        if pattern.is_empty() {
            return None;
        }
        self.assets
            .iter()
            .find(|asset| asset.browser_download_url.contains(pattern))
    }
}
