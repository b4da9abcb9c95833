//! genemap CLI Library
//!
//! Command-line interface for translating gene identifiers.
//!
//! # Overview
//!
//! - **Build**: download or read NCBI tables and persist a dictionary (`genemap build`)
//! - **Translate**: map symbols, Entrez IDs and aliases between namespaces (`genemap translate`)
//! - **Info**: show what the cached dictionary contains (`genemap info`)
//! - **Configuration**: inspect `GENEMAP_*` settings (`genemap config`)
//! - **Cache Management**: remove the cached dictionary (`genemap clean`)

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use genemap_core::KeyType;
use genemap_ingest::SourceLayout;
use std::path::PathBuf;

/// genemap - gene identifier translation
#[derive(Parser, Debug)]
#[command(name = "genemap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Cache directory holding the dictionary
    #[arg(long, env = "GENEMAP_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Print the full command reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the gene dictionary, downloading NCBI sources unless local files are given
    Build {
        /// Local gene table (.gz accepted)
        #[arg(long, requires = "history")]
        gene_info: Option<PathBuf>,

        /// Local gene history ledger (.gz accepted)
        #[arg(long, requires = "gene_info")]
        history: Option<PathBuf>,

        /// Gene table layout: ncbi or hgnc
        #[arg(long, default_value = "ncbi")]
        layout: SourceLayout,

        /// Rebuild even if a dictionary already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Translate identifiers from one key type to another
    Translate {
        /// Identifiers to translate ('-' reads one per line from stdin)
        #[arg(required = true)]
        queries: Vec<String>,

        /// Key type of the queries
        #[arg(long, default_value = "symbol")]
        from: KeyType,

        /// Key type to return
        #[arg(long, default_value = "entrez_id")]
        to: KeyType,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show which resolution step answered each query
        #[arg(long)]
        explain: bool,
    },

    /// Show metadata of the cached dictionary
    Info,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Remove the cached dictionary
    Clean {
        /// Also remove downloaded source tables
        #[arg(short, long)]
        all: bool,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show all configuration
    Show,
}

/// Output format for `genemap translate`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Tsv,
}
