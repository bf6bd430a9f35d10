//! Command-line interface for segstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod context;

/// segstore - File-segment store with merkle membership proofs
#[derive(Parser)]
#[command(
    name = "segstore",
    version,
    about = "Store file segments and prove their membership with merkle proofs",
    long_about = "segstore keeps uploaded segments of named files together with a SHA-256 merkle tree per file, and produces proofs that a segment belongs to the uploaded set."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Auto-answer yes to all prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Uploads directory (overrides storage.uploads_dir)
    #[arg(long, global = true, env = "SEGSTORE_DIR")]
    pub store: Option<PathBuf>,

    /// Configuration file (default: ~/.segstore/config.toml)
    #[arg(long, global = true, env = "SEGSTORE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a segment of a file
    Upload {
        /// File the segment belongs to
        file: String,

        /// Local path of the segment to upload
        path: PathBuf,

        /// Segment name (default: file name of PATH)
        #[arg(long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a stored segment
    Download {
        /// File the segment belongs to
        file: String,

        /// Segment name
        segment: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List stored files
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a file and all of its segments
    Delete {
        /// File to delete
        file: String,
    },

    /// Generate a membership proof for a segment
    Prove {
        /// File the segment belongs to
        file: String,

        /// Segment index (upload order, starting at 0)
        segment: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip verifying the proof before writing it
        #[arg(long)]
        no_verify: bool,
    },

    /// Verify a membership proof
    Verify {
        /// Proof file, or '-' for stdin
        proof: PathBuf,

        /// Trusted root hash (default: root embedded in the proof)
        #[arg(long)]
        root: Option<String>,

        /// Show each step of the recomputation
        #[arg(long)]
        steps: bool,
    },

    /// Show the current root hash of a file
    Root {
        /// File to inspect
        file: String,
    },

    /// Get and set configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// List configured values
    List,
    /// Print one value
    Get {
        /// Key, e.g. storage.uploads_dir
        key: String,
    },
    /// Set one value
    Set {
        /// Key, e.g. storage.record_format
        key: String,
        /// New value
        value: String,
    },
    /// Remove one value, restoring its default
    Unset {
        /// Key to remove
        key: String,
    },
    /// Print the configuration file location
    Path,
}
