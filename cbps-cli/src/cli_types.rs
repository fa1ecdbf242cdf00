//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cbps_lib::UPDATED_URLS_FILE;

#[derive(Parser)]
#[command(name = "cbpsdb")]
#[command(about = "Maintain the CBPS homebrew catalog", long_about = None)]
pub(crate) struct Cli {
    /// Catalog file to read and rewrite
    #[arg(long, global = true, default_value = "cbpsdb.csv")]
    pub db: PathBuf,

    /// GitHub token (overrides $GITHUB_TOKEN and the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Interactively add or replace an entry
    Add {
        /// Append the new entry after all existing ones instead of on top
        #[arg(long)]
        bottom: bool,
    },

    /// Refresh download links of GitHub-hosted entries
    Update {
        /// Report what would change without writing any file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Where to write the list of changed URLs
        #[arg(long, default_value = UPDATED_URLS_FILE)]
        urls_file: PathBuf,
    },

    /// Inspect GitHub settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the config file path
    Path,
}
