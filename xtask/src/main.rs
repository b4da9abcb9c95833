//! Build automation tasks for genemap
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for genemap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<genemap_cli::Cli>();

    let content = format!(
        r#"# genemap CLI Reference

Generated from the CLI source code on {}.

## Quick Start

```bash
# Download NCBI gene_info + gene_history and build the dictionary
genemap build

# Or build from local tables
genemap build --gene-info Homo_sapiens.gene_info.gz --history gene_history.gz --force

# Translate symbols (including aliases and retired symbols) to Entrez IDs
genemap translate BRCA1 tp53 RNF53 --from symbol --to entrez_id

# Show which resolution step answered each query
cut -f1 genes.txt | genemap translate - --from symbol --to entrez_id --explain --format tsv
```

## Commands

{}

## Environment Variables

- `GENEMAP_CACHE_DIR` - Where the dictionary and downloaded sources live
- `GENEMAP_GENE_INFO_URL`, `GENEMAP_HISTORY_URL` - Source table URLs
- `GENEMAP_TAXON_ID` - Taxon used to narrow the history ledger (default: `9606`)
- `GENEMAP_KEY_TYPES` - Key types indexed at build time (default: `symbol,entrez_id`)
- `GENEMAP_DOWNLOAD_TIMEOUT_SECS` - Download timeout (default: `300`)
- `GENEMAP_LOG_LEVEL`, `GENEMAP_LOG_OUTPUT`, `GENEMAP_LOG_FORMAT` - Logging

---

*To update, run `cargo run -p xtask -- generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());
    Ok(())
}
