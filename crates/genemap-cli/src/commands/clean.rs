//! `genemap clean` command implementation
//!
//! Removes the cached dictionary, its checksum sidecar and optionally the
//! downloaded source tables.

use crate::config::Config;
use crate::error::Result;
use crate::progress::format_bytes;
use colored::Colorize;
use genemap_common::checksum::sidecar_path;
use std::path::Path;

/// Clean cache
pub async fn run(config: &Config, all: bool) -> Result<()> {
    let snapshot = config.snapshot_path();
    let mut freed = remove_file(&snapshot)?;
    freed += remove_file(&sidecar_path(&snapshot))?;

    if all {
        let sources = config.sources_dir();
        if sources.exists() {
            freed += dir_size(&sources)?;
            std::fs::remove_dir_all(&sources)?;
        }
    }

    if freed == 0 {
        println!("Nothing to clean in {}", config.cache_dir().display());
    } else {
        println!("{} Cleaned {}", "✓".green(), config.cache_dir().display());
        println!("  Freed: {}", format_bytes(freed));
    }
    Ok(())
}

/// Remove `path` if present, returning the bytes freed
fn remove_file(path: &Path) -> Result<u64> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            std::fs::remove_file(path)?;
            Ok(meta.len())
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        total += if meta.is_dir() {
            dir_size(&entry.path())?
        } else {
            meta.len()
        };
    }
    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use genemap_core::SNAPSHOT_FILE_NAME;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::new().unwrap();
        config.set_cache_dir(dir.to_path_buf());
        config
    }

    #[tokio::test]
    async fn test_clean_removes_snapshot_and_sidecar() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        std::fs::write(dir.path().join(SNAPSHOT_FILE_NAME), b"snapshot").unwrap();
        std::fs::write(sidecar_path(&config.snapshot_path()), b"digest\n").unwrap();
        std::fs::create_dir_all(config.sources_dir()).unwrap();
        std::fs::write(config.sources_dir().join("gene_history_9606.tsv"), b"rows").unwrap();

        run(&config, false).await.unwrap();
        assert!(!config.snapshot_path().exists());
        assert!(!sidecar_path(&config.snapshot_path()).exists());
        assert!(config.sources_dir().exists());

        run(&config, true).await.unwrap();
        assert!(!config.sources_dir().exists());
    }

    #[tokio::test]
    async fn test_clean_empty_cache_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(run(&config_in(dir.path()), true).await.is_ok());
    }
}
