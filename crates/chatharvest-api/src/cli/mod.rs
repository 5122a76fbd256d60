//! CLI command definitions and handlers for the `charv` binary.
//!
//! Uses clap derive macros for argument parsing. `extract` keeps the
//! positional `<group-id> <analysis-type> [criteria]` shape of the original
//! scripts.

pub mod extract;
pub mod provision;
pub mod qr;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Capture a messaging login QR and harvest recent group messages.
#[derive(Parser)]
#[command(name = "charv", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path.
    #[arg(long, global = true, default_value = chatharvest_infra::config::CONFIG_FILE)]
    pub config: PathBuf,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a headless browser can be provisioned and launched.
    Provision,

    /// Clear the persisted session and capture a fresh login QR code.
    Qr,

    /// Extract recent messages from a group chat into a JSON file.
    Extract {
        /// Group identifier of the chat to extract.
        group_id: String,

        /// Analysis type: 'main_topics' or 'specific_messages'.
        analysis_type: String,

        /// Substring criteria (required for 'specific_messages').
        criteria: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
