//! Release lookup, transfer, and unpacking.
//!
//! # Sub-modules
//!
//! - [`metadata`] - Release-metadata model and asset selection.
//! - [`resolve`] - Metadata-or-fallback URL resolution.
//! - [`download`] - HTTP client trait and `ureq` implementation.
//! - [`extraction`] - Zip extraction with path traversal protection.

pub mod download;
pub mod extraction;
pub mod metadata;
pub mod resolve;
