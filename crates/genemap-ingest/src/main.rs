//! genemap-ingest: fetch source tables and build a dictionary snapshot

use anyhow::Result;
use clap::{Parser, Subcommand};
use genemap_common::logging::{init_logging, LogConfig, LogLevel};
use genemap_core::{KeyType, SNAPSHOT_FILE_NAME};
use genemap_ingest::ncbi::{self, DownloadConfig, NcbiDownloader};
use genemap_ingest::{build_snapshot, BuildRequest, SourceLayout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "genemap-ingest")]
#[command(author, version, about = "Fetch gene tables and build genemap snapshots")]
struct Cli {
    #[command(subcommand)]
    stage: Stage,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Stage {
    /// Download gene_info and gene_history from NCBI
    Download {
        /// Output directory
        #[arg(short, long, default_value = "./data/ncbi")]
        output: PathBuf,

        #[arg(long, default_value = ncbi::DEFAULT_GENE_INFO_URL)]
        gene_info_url: String,

        #[arg(long, default_value = ncbi::DEFAULT_HISTORY_URL)]
        history_url: String,

        /// Keep only history rows for this taxon
        #[arg(long, default_value_t = ncbi::DEFAULT_TAXON_ID)]
        taxon: u32,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Build a snapshot from local source tables
    Build {
        #[arg(long)]
        gene_info: PathBuf,

        #[arg(long)]
        history: PathBuf,

        /// Gene table layout: ncbi or hgnc
        #[arg(long, default_value = "ncbi")]
        layout: SourceLayout,

        #[arg(long)]
        taxon: Option<u32>,

        /// Extra key types to index (comma separated)
        #[arg(long, value_delimiter = ',')]
        key_types: Vec<KeyType>,

        /// Snapshot output path
        #[arg(short, long, default_value = SNAPSHOT_FILE_NAME)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("genemap-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    match cli.stage {
        Stage::Download {
            output,
            gene_info_url,
            history_url,
            taxon,
            timeout,
        } => {
            let config = DownloadConfig {
                gene_info_url,
                history_url,
                timeout: Duration::from_secs(timeout),
                taxon_id: Some(taxon),
                ..DownloadConfig::default()
            };
            let files = NcbiDownloader::new(config)?.fetch_all(&output).await?;
            info!(
                gene_info = %files.gene_info.display(),
                history = %files.history.display(),
                "sources downloaded"
            );
        },
        Stage::Build {
            gene_info,
            history,
            layout,
            taxon,
            key_types,
            output,
        } => {
            let request = BuildRequest::new(gene_info, history)
                .layout(layout)
                .taxon_id(taxon)
                .key_types(key_types);
            let (snapshot, stats) = build_snapshot(&request)?;
            let digest = snapshot.save(&output)?;
            info!(
                path = %output.display(),
                records = stats.records,
                checksum = %digest,
                "snapshot written"
            );
        },
    }

    Ok(())
}
