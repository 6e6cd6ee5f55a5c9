//! Web UI fetcher library.
//!
//! Downloads the latest release archive of a static web UI and unpacks it into
//! a local directory. It is used by the `webui-fetcher` CLI binary and can be
//! consumed programmatically for testing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Built-in defaults and TOML overrides
//! - [`error`] - Fatal error types and exit codes
//! - [`fetcher`] - The resolve, download, extract, and list pipeline
//! - [`listing`] - Directory listing for the success report
//! - [`output`] - User-facing message formatting
//! - [`release`] - Release metadata, HTTP transfer, and zip extraction

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod listing;
pub mod output;
pub mod release;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
