//! genemap ingest
//!
//! Turns NCBI (or HGNC) source tables into a genemap dictionary snapshot.
//!
//! # Stages
//!
//! - [`ncbi`]: download `gene_info` and `gene_history`, narrowing the history to one taxon
//! - [`gene_table`] and [`gene_history`]: parse the tab-delimited tables, failing fast on bad rows
//! - [`pipeline`]: build the dictionary and historical index into a [`genemap_core::Snapshot`]
//!
//! # Example
//!
//! ```no_run
//! use genemap_ingest::ncbi::{DownloadConfig, NcbiDownloader};
//! use genemap_ingest::pipeline::{build_snapshot, BuildRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DownloadConfig::default();
//!     let taxon = config.taxon_id;
//!     let files = NcbiDownloader::new(config)?.fetch_all("./data/ncbi").await?;
//!     let request = BuildRequest::new(files.gene_info, files.history).taxon_id(taxon);
//!     let (snapshot, _stats) = build_snapshot(&request)?;
//!     snapshot.save("./data/gene_dictionary.json.gz")?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod gene_history;
pub mod gene_table;
pub mod layout;
pub mod ncbi;
pub mod pipeline;
pub mod source;

pub use layout::SourceLayout;
pub use pipeline::{build_snapshot, BuildRequest};
