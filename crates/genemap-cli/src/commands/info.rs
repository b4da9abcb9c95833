//! `genemap info` command implementation
//!
//! Prints snapshot metadata and per-key-type table sizes.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::progress::format_bytes;
use colored::Colorize;
use genemap_core::Snapshot;

pub async fn run(config: &Config) -> Result<()> {
    let path = config.snapshot_path();
    if !path.exists() {
        return Err(CliError::not_built(path.display().to_string()));
    }

    let size = std::fs::metadata(&path)?.len();
    let snapshot = Snapshot::load(&path)?;
    let source = &snapshot.source;

    println!("{}", "Gene Dictionary:".cyan().bold());
    println!();
    println!("{:<16} {}", "path:", path.display());
    println!("{:<16} {}", "size:", format_bytes(size));
    println!("{:<16} {}", "built:", snapshot.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("{:<16} {}", "format:", snapshot.format_version);
    println!(
        "{:<16} {} ({} layout, {} rows)",
        "gene table:", source.gene_table, source.layout, source.gene_rows
    );
    println!(
        "{:<16} {} ({} rows)",
        "history:", source.history_table, source.history_rows
    );
    if let Some(taxon) = source.taxon_id {
        println!("{:<16} {}", "taxon:", taxon);
    }

    println!();
    println!("{}", "Tables:".cyan());
    println!("  {:<18} {}", "genes", snapshot.dictionary.len());
    for key_type in snapshot.dictionary.key_types() {
        let table = snapshot.dictionary.table(key_type)?;
        println!("  {:<18} {}", key_type.as_str(), table.len());
    }
    println!("  {:<18} {}", "retired ids", snapshot.history.retired_entrez_count());
    println!("  {:<18} {}", "retired symbols", snapshot.history.retired_symbol_count());

    Ok(())
}
