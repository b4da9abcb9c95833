//! Error types for the genemap CLI
//!
//! Messages are user-facing: each one says what went wrong and, where there
//! is one, the command that fixes it.

use genemap_common::GenemapError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// No snapshot in the cache directory
    #[error("No gene dictionary found at '{0}'. Run 'genemap build' to create one.")]
    NotBuilt(String),

    /// Snapshot contents do not match their checksum
    #[error("Gene dictionary '{file}' is corrupted (expected checksum {expected}, got {actual}). Run 'genemap build --force' to rebuild it.")]
    Corrupted {
        file: String,
        expected: String,
        actual: String,
    },

    /// Key type missing from the dictionary or unknown
    #[error("{0}. Rebuild with GENEMAP_KEY_TYPES including it, e.g. 'GENEMAP_KEY_TYPES=symbol,entrez_id,uniprot genemap build --force'.")]
    KeyType(String),

    /// Source table could not be parsed
    #[error("{0}. Check the --layout option matches the file.")]
    SourceFormat(String),

    /// Download failed
    #[error("Download failed: {0}. Check your internet connection or pass --gene-info/--history to build from local files.")]
    Network(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your GENEMAP_* environment variables.")]
    Config(String),

    /// Nothing to translate
    #[error("No queries given. Pass identifiers as arguments or '-' to read them from stdin.")]
    NoQueries,

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Genemap(GenemapError),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not-built error for the given snapshot path
    pub fn not_built(path: impl Into<String>) -> Self {
        Self::NotBuilt(path.into())
    }
}

impl From<GenemapError> for CliError {
    fn from(err: GenemapError) -> Self {
        match err {
            GenemapError::UnknownKeyType(_) | GenemapError::KeyTypeNotConfigured { .. } => {
                Self::KeyType(err.to_string())
            },
            GenemapError::SourceFormat { .. } => Self::SourceFormat(err.to_string()),
            GenemapError::ChecksumMismatch { expected, actual } => Self::Corrupted {
                file: genemap_core::SNAPSHOT_FILE_NAME.to_string(),
                expected,
                actual,
            },
            GenemapError::Network(msg) => Self::Network(msg),
            GenemapError::Config(msg) => Self::Config(msg),
            GenemapError::Io(e) => Self::Io(e),
            other => Self::Genemap(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_errors_suggest_rebuild() {
        let err: CliError = GenemapError::KeyTypeNotConfigured {
            key_type: "uniprot".into(),
            available: "symbol, entrez_id".into(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("uniprot"));
        assert!(msg.contains("GENEMAP_KEY_TYPES"));
    }

    #[test]
    fn test_checksum_mismatch_suggests_force() {
        let err: CliError = GenemapError::ChecksumMismatch {
            expected: "aa".into(),
            actual: "bb".into(),
        }
        .into();
        assert!(err.to_string().contains("genemap build --force"));
    }

    #[test]
    fn test_io_errors_keep_their_own_variant() {
        let err: CliError =
            GenemapError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked")).into();
        assert!(matches!(err, CliError::Io(_)));
        assert!(err.to_string().contains("Check file permissions"));
    }

    #[test]
    fn test_snapshot_errors_pass_through() {
        let err: CliError = GenemapError::snapshot("bad version").into();
        assert!(matches!(err, CliError::Genemap(_)));
        assert!(err.to_string().contains("bad version"));
    }
}
