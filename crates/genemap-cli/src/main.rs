//! genemap CLI - Main entry point

use clap::Parser;
use genemap_cli::{Cli, Commands, Config, ConfigCommand};
use genemap_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // Verbose: debug to console. Otherwise only warnings, so stdout stays clean.
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("genemap-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(cli: &Cli) -> genemap_cli::Result<()> {
    let Some(ref command) = cli.command else {
        return Ok(());
    };

    let mut config = Config::from_env()?;
    if let Some(dir) = &cli.cache_dir {
        config.set_cache_dir(dir.clone());
    }

    match command {
        Commands::Build {
            gene_info,
            history,
            layout,
            force,
        } => {
            genemap_cli::commands::build::run(
                &config,
                gene_info.clone(),
                history.clone(),
                layout.clone(),
                *force,
                !console_attached(),
            )
            .await
        },

        Commands::Translate {
            queries,
            from,
            to,
            format,
            explain,
        } => {
            genemap_cli::commands::translate::run(
                &config,
                queries.clone(),
                *from,
                *to,
                *format,
                *explain,
            )
            .await
        },

        Commands::Info => genemap_cli::commands::info::run(&config).await,

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => genemap_cli::commands::config::get(&config, key).await,
            ConfigCommand::Show => genemap_cli::commands::config::show(&config).await,
        },

        Commands::Clean { all } => genemap_cli::commands::clean::run(&config, *all).await,
    }
}

/// Progress output only makes sense on an interactive terminal
fn console_attached() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}
