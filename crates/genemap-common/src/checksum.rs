//! SHA-256 helpers for snapshot integrity
//!
//! A snapshot is written together with a `<file>.sha256` sidecar holding the
//! hex digest of its bytes; loading verifies the pair before deserialising.

use crate::error::{GenemapError, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Compute SHA-256 checksum of bytes
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA-256 checksum of a file
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path.as_ref())?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify that data matches the expected checksum
pub fn verify_checksum(data: &[u8], expected: &str) -> Result<()> {
    let actual = compute_checksum(data);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(GenemapError::ChecksumMismatch {
            expected: expected.trim().to_string(),
            actual,
        })
    }
}

/// Path of the checksum sidecar for `path` (`foo.json.gz` -> `foo.json.gz.sha256`)
pub fn sidecar_path(path: impl AsRef<Path>) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(".sha256");
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_compute_checksum() {
        // SHA-256 of "hello world"
        assert_eq!(
            compute_checksum(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_file_checksum_matches_bytes() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"test data").unwrap();
        temp_file.flush().unwrap();

        let checksum = compute_file_checksum(temp_file.path()).unwrap();
        assert_eq!(
            checksum,
            "916f0027a575074ce72a331777c3478d6513f786a591bd892da1a577bf2335f9"
        );
        assert_eq!(checksum, compute_checksum(b"test data"));
    }

    #[test]
    fn test_verify_checksum() {
        let expected = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9\n";
        assert!(verify_checksum(b"hello world", expected).is_ok());

        let result = verify_checksum(b"hello world!", expected);
        assert!(matches!(result.unwrap_err(), GenemapError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path("/tmp/gene_dictionary.json.gz"),
            PathBuf::from("/tmp/gene_dictionary.json.gz.sha256")
        );
    }
}
