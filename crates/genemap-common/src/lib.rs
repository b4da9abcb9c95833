//! genemap common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling, logging and integrity helpers for the genemap workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`GenemapError`] and the crate-wide [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **Checksums**: SHA-256 helpers used to verify dictionary snapshots
//!
//! # Example
//!
//! ```no_run
//! use genemap_common::{checksum, Result};
//!
//! fn fingerprint(path: &str) -> Result<()> {
//!     let digest = checksum::compute_file_checksum(path)?;
//!     println!("{path}: {digest}");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

pub use error::{GenemapError, Result};
