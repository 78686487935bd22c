//! CLI commands and argument parsing

use crate::filter::SortOrder;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strategy list browser
#[derive(Parser, Debug)]
#[command(name = "strategy-feed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Feed configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load strategies page by page and print them
    Browse {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Category filter
        #[arg(long)]
        category: Option<String>,

        /// Strategy type filter
        #[arg(long = "type")]
        strategy_type: Option<String>,

        /// Field to sort by
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort direction (asc or desc)
        #[arg(long)]
        order: Option<SortOrder>,

        /// Number of pages to load
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Validate a config file
    Validate,

    /// Print the default config as YAML
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable table
    Pretty,
}
