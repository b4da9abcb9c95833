//! Persisted dictionary snapshot
//!
//! The build phase writes a [`Snapshot`] once; every query session loads it
//! read-only. On disk it is gzip-compressed JSON with a SHA-256 sidecar.

use crate::history::HistoricalIndex;
use crate::model::Dictionary;
use crate::translate::Translator;
use chrono::{DateTime, Utc};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use genemap_common::{checksum, GenemapError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Bumped whenever the serialized layout changes
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Default snapshot file name inside the cache directory
pub const SNAPSHOT_FILE_NAME: &str = "gene_dictionary.json.gz";

/// Where a snapshot's contents came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub gene_table: String,
    pub history_table: String,
    /// Column layout of the gene table, e.g. `ncbi_gene_info`
    pub layout: String,
    pub taxon_id: Option<u32>,
    pub gene_rows: usize,
    pub history_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub source: SourceInfo,
    pub dictionary: Dictionary,
    pub history: HistoricalIndex,
}

impl Snapshot {
    pub fn new(source: SourceInfo, dictionary: Dictionary, history: HistoricalIndex) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: Utc::now(),
            source,
            dictionary,
            history,
        }
    }

    /// Serialize to gzip-compressed JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        serde_json::to_writer(&mut encoder, self)?;
        Ok(encoder.finish()?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_reader(GzDecoder::new(bytes))?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(GenemapError::snapshot(format!(
                "unsupported format version {} (expected {}); rebuild with 'genemap build --force'",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }
        Ok(snapshot)
    }

    /// Write the snapshot and its checksum sidecar, returning the checksum.
    ///
    /// Each file is replaced atomically, so neither is ever seen half written.
    /// The pair is not: a reader racing a rebuild can load the new snapshot
    /// against the old sidecar and get a checksum mismatch.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let bytes = self.to_bytes()?;
        let digest = checksum::compute_checksum(&bytes);

        replace_file(dir, path, &bytes)?;
        replace_file(dir, &checksum::sidecar_path(path), format!("{digest}\n").as_bytes())?;

        info!(
            bytes = bytes.len(),
            records = self.dictionary.len(),
            checksum = %digest,
            "snapshot saved"
        );
        Ok(digest)
    }

    /// Load a snapshot, verifying the checksum sidecar when one is present
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GenemapError::snapshot(format!(
                    "no dictionary at {}; run 'genemap build' first",
                    path.display()
                ))
            } else {
                GenemapError::Io(e)
            }
        })?;

        let sidecar = checksum::sidecar_path(path);
        match std::fs::read_to_string(&sidecar) {
            Ok(expected) => checksum::verify_checksum(&bytes, &expected)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(sidecar = %sidecar.display(), "checksum sidecar missing, skipping verification");
            }
            Err(e) => return Err(e.into()),
        }

        let snapshot = Self::from_bytes(&bytes)?;
        info!(
            records = snapshot.dictionary.len(),
            key_types = %snapshot
                .dictionary
                .key_types()
                .map(|kt| kt.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            retired_ids = snapshot.history.retired_entrez_count(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn into_translator(self) -> Translator {
        Translator::new(self.dictionary, self.history)
    }
}

/// Write `bytes` to a temp file in `dir`, then rename it over `path`
fn replace_file(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| GenemapError::Io(e.error))?;
    Ok(())
}
