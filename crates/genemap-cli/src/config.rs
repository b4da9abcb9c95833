//! Configuration management for the genemap CLI
//!
//! Settings come from `GENEMAP_*` environment variables (a `.env` file is
//! loaded first by `main`), falling back to the defaults below.

use crate::error::{CliError, Result};
use genemap_core::{KeyType, SNAPSHOT_FILE_NAME};
use genemap_ingest::ncbi::{self, DownloadConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Default request timeout for source downloads
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Keys accepted by `genemap config get`, with their environment variables
pub const CONFIG_KEYS: &[(&str, &str)] = &[
    ("cache_dir", "GENEMAP_CACHE_DIR"),
    ("gene_info_url", "GENEMAP_GENE_INFO_URL"),
    ("history_url", "GENEMAP_HISTORY_URL"),
    ("taxon_id", "GENEMAP_TAXON_ID"),
    ("key_types", "GENEMAP_KEY_TYPES"),
    ("download_timeout_secs", "GENEMAP_DOWNLOAD_TIMEOUT_SECS"),
];

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the snapshot and downloaded sources
    pub cache_dir: PathBuf,
    pub gene_info_url: String,
    pub history_url: String,
    pub taxon_id: u32,
    /// Key types indexed at build time
    pub key_types: Vec<KeyType>,
    pub download_timeout_secs: u64,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| CliError::config("Could not determine cache directory"))?
            .join("genemap");

        Ok(Self {
            cache_dir,
            gene_info_url: ncbi::DEFAULT_GENE_INFO_URL.to_string(),
            history_url: ncbi::DEFAULT_HISTORY_URL.to_string(),
            taxon_id: ncbi::DEFAULT_TAXON_ID,
            key_types: KeyType::REQUIRED.to_vec(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        })
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(cache) = std::env::var("GENEMAP_CACHE_DIR") {
            config.cache_dir = PathBuf::from(cache);
        }
        if let Ok(url) = std::env::var("GENEMAP_GENE_INFO_URL") {
            config.gene_info_url = url;
        }
        if let Ok(url) = std::env::var("GENEMAP_HISTORY_URL") {
            config.history_url = url;
        }
        if let Ok(taxon) = std::env::var("GENEMAP_TAXON_ID") {
            config.taxon_id = taxon
                .trim()
                .parse()
                .map_err(|_| CliError::config(format!("GENEMAP_TAXON_ID '{taxon}' is not a number")))?;
        }
        if let Ok(types) = std::env::var("GENEMAP_KEY_TYPES") {
            config.key_types = parse_key_types(&types)?;
        }
        if let Ok(secs) = std::env::var("GENEMAP_DOWNLOAD_TIMEOUT_SECS") {
            config.download_timeout_secs = secs.trim().parse().map_err(|_| {
                CliError::config(format!("GENEMAP_DOWNLOAD_TIMEOUT_SECS '{secs}' is not a number"))
            })?;
        }

        Ok(config)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn set_cache_dir(&mut self, dir: PathBuf) {
        self.cache_dir = dir;
    }

    /// Location of the persisted dictionary
    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(SNAPSHOT_FILE_NAME)
    }

    /// Where downloaded source tables are kept
    pub fn sources_dir(&self) -> PathBuf {
        self.cache_dir.join("sources")
    }

    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            gene_info_url: self.gene_info_url.clone(),
            history_url: self.history_url.clone(),
            timeout: Duration::from_secs(self.download_timeout_secs),
            taxon_id: Some(self.taxon_id),
            ..DownloadConfig::default()
        }
    }

    /// Look up a setting by its `genemap config get` key
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "cache_dir" => self.cache_dir.display().to_string(),
            "gene_info_url" => self.gene_info_url.clone(),
            "history_url" => self.history_url.clone(),
            "taxon_id" => self.taxon_id.to_string(),
            "key_types" => self
                .key_types
                .iter()
                .map(|kt| kt.as_str())
                .collect::<Vec<_>>()
                .join(","),
            "download_timeout_secs" => self.download_timeout_secs.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        // If we can't determine the cache directory, fall back to a local directory
        Self::new().unwrap_or_else(|_| Self {
            cache_dir: PathBuf::from(".genemap-cache"),
            gene_info_url: ncbi::DEFAULT_GENE_INFO_URL.to_string(),
            history_url: ncbi::DEFAULT_HISTORY_URL.to_string(),
            taxon_id: ncbi::DEFAULT_TAXON_ID,
            key_types: KeyType::REQUIRED.to_vec(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        })
    }
}

/// Parse a comma-separated key type list, e.g. `symbol,entrez_id,uniprot`
pub fn parse_key_types(value: &str) -> Result<Vec<KeyType>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<KeyType>().map_err(CliError::from))
        .collect()
}
