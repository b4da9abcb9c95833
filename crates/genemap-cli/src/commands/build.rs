//! `genemap build` command implementation

use crate::config::Config;
use crate::error::Result;
use crate::progress::create_spinner;
use colored::Colorize;
use genemap_core::BuildStats;
use genemap_ingest::ncbi::NcbiDownloader;
use genemap_ingest::{build_snapshot, BuildRequest, SourceLayout};
use std::path::PathBuf;
use tracing::info;

/// Build and persist the dictionary
pub async fn run(
    config: &Config,
    gene_info: Option<PathBuf>,
    history: Option<PathBuf>,
    layout: SourceLayout,
    force: bool,
    quiet: bool,
) -> Result<()> {
    let snapshot_path = config.snapshot_path();
    if snapshot_path.exists() && !force {
        println!(
            "{} Dictionary already built at {}",
            "✓".green(),
            snapshot_path.display()
        );
        println!("  Use --force to rebuild it");
        return Ok(());
    }

    let (gene_info, history) = match (gene_info, history) {
        (Some(gene_info), Some(history)) => (gene_info, history),
        _ => {
            let mut download = config.download_config();
            download.show_progress = !quiet;
            info!(dir = %config.sources_dir().display(), "downloading NCBI sources");
            let files = NcbiDownloader::new(download)?
                .fetch_all(config.sources_dir())
                .await?;
            (files.gene_info, files.history)
        },
    };

    let request = BuildRequest::new(gene_info, history)
        .layout(layout)
        .taxon_id(Some(config.taxon_id))
        .key_types(config.key_types.iter().copied());

    let spinner = create_spinner("Building gene dictionary...", quiet);
    let (snapshot, stats) = build_snapshot(&request)?;
    spinner.set_message("Saving gene dictionary...");
    let digest = snapshot.save(&snapshot_path)?;
    spinner.finish_and_clear();

    print_summary(&stats, snapshot.history.retired_entrez_count());
    println!();
    println!("  Saved:    {}", snapshot_path.display());
    println!("  SHA-256:  {}", digest);
    Ok(())
}

fn print_summary(stats: &BuildStats, retired_ids: usize) {
    println!(
        "{} Built dictionary: {} genes from {} rows",
        "✓".green(),
        stats.records,
        stats.rows
    );
    for (key_type, size) in &stats.table_sizes {
        println!("  {:<16} {} keys", format!("{key_type}:"), size);
    }
    println!("  {:<16} {}", "retired IDs:", retired_ids);
    if stats.canonical_overrides > 0 || stats.shadowed_aliases > 0 {
        println!(
            "  {} {} aliases overridden by canonical symbols, {} shadowed by earlier genes",
            "ℹ".cyan(),
            stats.canonical_overrides,
            stats.shadowed_aliases
        );
    }
}
