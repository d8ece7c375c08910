//! CLI argument definitions for fwdiag
//!
//! All clap-derived structs and enums for command-line parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fwdiag")]
#[command(about = "Firmware diag telemetry decoder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a captured firmware buffer into readable log lines
    Decode {
        /// Path to the descriptor file (data.msc)
        #[arg(short, long)]
        db: PathBuf,

        /// Path to the raw capture buffer
        #[arg(short, long)]
        input: PathBuf,

        /// Firmware image's format-file version; defaults to the
        /// descriptor file's own version
        #[arg(long)]
        fw_version: Option<i32>,

        /// Write decoded lines to the console
        #[arg(long)]
        console: bool,

        /// Write decoded lines to this log file
        #[arg(long)]
        logfile: Option<PathBuf>,

        /// Record count at which the log file wraps around
        #[arg(long, default_value = "10000")]
        max_records: u32,

        /// Route lines onto the diagnostic bus and deliver event/log
        /// records to the subsystem (trace-log backed)
        #[arg(long)]
        bus: bool,

        /// Suppress the numbered console echo of the log-file path
        #[arg(long)]
        silent: bool,

        /// Hex-dump the buffer to the trace log while decoding
        #[arg(long)]
        debug: bool,
    },

    /// Descriptor database operations
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Subcommand)]
pub enum DbCommand {
    /// Show capacity, entry count, and version of a descriptor file
    Info {
        /// Path to the descriptor file
        #[arg(short, long)]
        db: PathBuf,

        /// Emit the stats as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up one message id
    Lookup {
        /// Path to the descriptor file
        #[arg(short, long)]
        db: PathBuf,

        /// Message id to look up
        id: u32,
    },

    /// Expand a run-length pack specifier
    Expand {
        /// Raw pack string, e.g. "3b2h"
        pack: String,
    },
}
