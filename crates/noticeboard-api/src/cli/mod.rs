//! CLI command definitions for the `nboard` binary.
//!
//! Uses clap derive macros for argument parsing. Operator commands follow a
//! noun-verb pattern (`nboard records list lectures`).

pub mod chat;
pub mod records;
pub mod sections;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use noticeboard_types::record::RecordId;
use noticeboard_types::section::SectionKey;

/// Run and administer a sectioned chat noticeboard.
#[derive(Parser)]
#[command(name = "nboard", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Data directory (database, config.toml, section texts).
    #[arg(long, global = true, env = "NOTICEBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Talk to the board from this terminal.
    Chat {
        /// Chat id the console session speaks in.
        #[arg(long, default_value = "1")]
        chat: i64,

        /// Actor id of the console user (must be in `admins` for /admin).
        #[arg(long, default_value = "1")]
        actor: i64,
    },

    /// Start the REST adapter.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Manage records directly in the store.
    #[command(alias = "rec")]
    Records {
        #[command(subcommand)]
        action: RecordsCommand,
    },

    /// List the section catalog with record counts.
    Sections,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RecordsCommand {
    /// List a section's records, newest first.
    #[command(alias = "ls")]
    List {
        /// Section key (e.g. `lectures`).
        section: SectionKey,
    },

    /// Show one record in full.
    Show { id: RecordId },

    /// Append a record to a section.
    Add {
        section: SectionKey,
        /// Record text.
        body: String,
        /// Extended details.
        #[arg(long)]
        details: Option<String>,
    },

    /// Set a record's details; "-" removes them.
    #[command(name = "set-details")]
    SetDetails { id: RecordId, details: String },

    /// Replace a record's text and details.
    Replace {
        id: RecordId,
        body: String,
        #[arg(long)]
        details: Option<String>,
    },

    /// Delete a record.
    #[command(alias = "rm")]
    Delete { id: RecordId },
}
