//! CLI module
//!
//! Command-line interface for browsing a strategy list.
//!
//! # Commands
//!
//! - `browse` - Load pages of strategies with filters and print them
//! - `validate` - Validate a config file
//! - `config` - Print the default config

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{summary_line, table_row, BrowseArgs, Runner};
