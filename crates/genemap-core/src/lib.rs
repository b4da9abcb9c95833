//! genemap core
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Gene identifier dictionary and translator.
//!
//! - [`builder`]: turns gene table rows into a multi-key [`Dictionary`]
//! - [`history`]: indexes retired Entrez IDs and symbols from the history ledger
//! - [`translate`]: resolves queries between key types, with case-insensitive
//!   and historical fallbacks
//! - [`snapshot`]: the persisted `{dictionary, history}` bundle
//!
//! # Example
//!
//! ```no_run
//! use genemap_core::{KeyType, Snapshot};
//!
//! fn main() -> genemap_common::Result<()> {
//!     let translator = Snapshot::load("gene_dictionary.json.gz")?.into_translator();
//!     let symbols = translator.translate([23u64, 1], KeyType::EntrezId, KeyType::Symbol)?;
//!     let ids = translator.translate(symbols.results.values().flatten(), KeyType::Symbol, KeyType::EntrezId)?;
//!     println!("{:?}", ids.results);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod history;
pub mod model;
pub mod snapshot;
pub mod translate;

pub use builder::{BuildConfig, BuildStats, DictionaryBuilder, GeneRow};
pub use history::{HistoricalIndex, HistoryRow, Predecessors, Succession};
pub use model::{Dictionary, GeneRecord, GeneValue, KeyType, QueryValue, Table};
pub use snapshot::{Snapshot, SourceInfo, SNAPSHOT_FILE_NAME, SNAPSHOT_FORMAT_VERSION};
pub use translate::{Resolution, Strategy, Translation, TranslationReport, Translator, RESOLUTION_ORDER};
