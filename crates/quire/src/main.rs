//! Quire CLI - load YAML config files as JavaScript modules.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Load YAML config files as JavaScript modules")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to quire.toml config file
    #[arg(short, long, default_value = "quire.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one module and print the generated code
    Load {
        /// Module identifier (a file path)
        id: String,

        /// Print the full load result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every config module in a directory round-trips
    Check {
        /// Directory to scan (defaults to config or "docs")
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file_config = ConfigFile::load(&cli.config)?;
    let chain = file_config.loader_chain()?;

    match cli.command {
        Commands::Load { id, json } => {
            commands::load::run(&chain, &id, json)?;
        }
        Commands::Check { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&file_config.check.dir));
            commands::check::run(&chain, &file_config.decode_options(), &dir)?;
        }
    }

    Ok(())
}
