//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE};

#[derive(Debug, Parser)]
#[command(name = "recfinder", version, about = "Export call-recording metadata to CSV")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export every recording in an inclusive date range (bulk columns).
    Range {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Last day, YYYY-MM-DD (inclusive)
        #[arg(long)]
        end: String,
        #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
    },

    /// Export recordings for conversation IDs listed in a CSV or Excel file.
    Ids {
        #[arg(long, short, default_value = DEFAULT_INPUT_FILE)]
        input: PathBuf,
        #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
        /// Maximum identifiers to process (overrides RECFINDER_MAX_IDS)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print a conversation's details as JSON.
    Conversation {
        conversation_id: String,
    },

    /// Print the status of one recording as JSON.
    Status {
        conversation_id: String,
        recording_id: String,
    },
}
