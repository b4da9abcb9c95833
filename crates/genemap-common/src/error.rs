//! Error types for genemap

use thiserror::Error;

/// Result type alias for genemap operations
pub type Result<T> = std::result::Result<T, GenemapError>;

/// Main error type for genemap
///
/// Unresolved queries and missing fields are not errors: they come back as
/// `None` results plus an entry in the translation report.
#[derive(Error, Debug)]
pub enum GenemapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A key type name that genemap does not know about
    #[error("Unknown key type '{0}' (expected one of: symbol, entrez_id, alias_symbol, uniprot, ensembl_gene_id)")]
    UnknownKeyType(String),

    /// A known key type that the loaded dictionary was not built with
    #[error("Key type '{key_type}' is not configured in this dictionary (available: {available})")]
    KeyTypeNotConfigured { key_type: String, available: String },

    /// Malformed gene table or history row
    #[error("Malformed {source_name} at line {line}: {message}")]
    SourceFormat {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl GenemapError {
    /// Create a source format error
    pub fn source_format(
        source_name: impl Into<String>,
        line: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceFormat {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a snapshot error
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// True for errors caused by the caller asking for a key type the
    /// dictionary cannot serve.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownKeyType(_) | Self::KeyTypeNotConfigured { .. })
    }
}
