//! archgraph CLI tool.
//!
//! Usage:
//! ```bash
//! archgraph check [OPTIONS] [PATH]
//! archgraph list-checks
//! archgraph init
//! archgraph edges [PATH]
//! ```

use anyhow::Result;
use archgraph_core::Severity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Architecture rule checks over import graphs
#[derive(Parser)]
#[command(name = "archgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured checks
    Check {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific checks (comma-separated names)
        #[arg(long)]
        only: Option<String>,

        /// Lowest severity that fails the run
        #[arg(long, default_value = "error", value_parser = parse_severity)]
        fail_on: Severity,
    },

    /// List check kinds and the configured checks
    ListChecks {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Print extracted raw edges as JSON
    Edges {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    Severity::parse(value)
        .ok_or_else(|| format!("unknown severity '{value}' (expected error, warning or info)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            only,
            fail_on,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let only: Vec<String> = only
                .map(|list| list.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();
            commands::check::run(&path, format, &only, fail_on, &source).await
        }
        Commands::ListChecks { path } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::list_checks::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
        Commands::Edges { path } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::edges::run(&path, &source).await
        }
    }
}
