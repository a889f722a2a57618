//! CLI definitions for Proofmark.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Proofmark CLI.
#[derive(Parser)]
#[command(name = "proofmark")]
#[command(about = "Grammar-correction overlay for editable text fields")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Correct a piece of text and print the word diff
    Check {
        /// Text to check
        text: Option<String>,

        /// Read the text from standard input
        #[arg(long, conflicts_with = "text")]
        stdin: bool,
    },

    /// Replay a JSON-lines page script against the in-memory page
    Replay {
        /// Path to the script
        script: PathBuf,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Load and validate the configuration
    Validate,

    /// Print the effective configuration as TOML
    Show,
}
