//! # JournalTrace CLI
//!
//! Command-line interface for the JournalTrace USN journal scanner.
//!
//! ## Commands
//!
//! - `journaltrace scan` - Scan the change journals of all NTFS volumes
//! - `journaltrace drives` - List NTFS volumes eligible for scanning
//!
//! ## Example Usage
//!
//! ```bash
//! # Scan every NTFS volume and export the trace (requires admin)
//! journaltrace scan --output trace.csv
//!
//! # Quick pass without full path resolution
//! journaltrace scan --fast
//!
//! # Show scannable volumes
//! journaltrace drives
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// JournalTrace - forensic scanner for NTFS USN change journals
#[derive(Parser)]
#[command(name = "journaltrace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the USN journals of all NTFS volumes
    Scan {
        /// Skip full path resolution for a faster pass
        #[arg(long)]
        fast: bool,

        /// Write the collected entries to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print entries as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List NTFS volumes eligible for scanning
    Drives {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => journaltrace_core::Config::load_from(path)?,
        None => journaltrace_core::Config::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Scan { fast, output, json } => commands::scan::run(config, fast, output, json),
        Commands::Drives { output } => commands::drives::run(output),
    }
}
