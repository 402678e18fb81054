//! declint CLI tool.
//!
//! Usage:
//! ```bash
//! declint check [OPTIONS] [PATHS]...
//! declint dump-conventions
//! declint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Naming convention checker for C and C++ sources
#[derive(Parser)]
#[command(name = "declint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a style file (default: ./declint.toml when present)
    #[arg(short, long, global = true)]
    style: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check naming conventions
    Check {
        /// Files or directories to check (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Recurse into subdirectories
        #[arg(short, long)]
        recurse: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude files matching this glob (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// File extensions to pick up when walking directories
        /// (default: c cc cpp cxx h hh hpp)
        #[arg(long = "filetype")]
        filetypes: Vec<String>,
    },

    /// Print the active conventions and their patterns
    DumpConventions,

    /// Write a starter style file
    Init {
        /// Overwrite an existing style file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for violations.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output, one object per violation.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            recurse,
            format,
            exclude,
            filetypes,
        } => commands::check::run(
            &paths,
            cli.style.as_deref(),
            recurse,
            &exclude,
            &filetypes,
            format,
        ),
        Commands::DumpConventions => commands::dump::run(cli.style.as_deref()),
        Commands::Init { force } => commands::init::run(force),
    }
}
