//! NCBI Gene FTP source
//!
//! Fetches `<Organism>.gene_info.gz` and `gene_history.gz` over HTTPS and
//! narrows the (very large, all-species) history ledger to a single taxon.

pub mod download;

pub use download::{narrow_history, DownloadConfig, DownloadedFiles, NcbiDownloader};

/// Human gene table
pub const DEFAULT_GENE_INFO_URL: &str =
    "https://ftp.ncbi.nih.gov/gene/DATA/GENE_INFO/Mammalia/Homo_sapiens.gene_info.gz";

/// All-species history ledger
pub const DEFAULT_HISTORY_URL: &str = "https://ftp.ncbi.nih.gov/gene/DATA/gene_history.gz";

/// Homo sapiens
pub const DEFAULT_TAXON_ID: u32 = 9606;
