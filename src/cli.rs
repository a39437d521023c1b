//! CLI struct definitions for the gozelle command-line interface.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use crate::plugins::shell::Shell;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "gozelle",
    version = env!("CARGO_PKG_VERSION"),
    about = "Gozelle - smart directory jumper. Remembers where you go and takes you back with a keyword."
)]
pub(crate) struct Cli {
    /// Debug-level logs on stderr.
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,
    /// Only errors on stderr.
    #[clap(long, short = 'q', global = true)]
    pub quiet: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Add a directory to the index
    Add {
        /// Directory to record (relative paths resolve against the current directory).
        path: PathBuf,
    },
    /// Remove a directory from the index
    Remove {
        /// Directory to forget, exactly as listed.
        path: String,
    },
    /// List all indexed directories, best first
    List {
        /// Output format: 'text' or 'json'.
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the best match for the keywords and record the visit
    Query {
        /// Keywords, matched in order; the last one must hit the final path component.
        keywords: Vec<String>,
    },
    /// Pick a directory with a fuzzy filter (requires fzf)
    Interactive,
    /// Print shell integration: eval "$(gozelle init bash)"
    Init {
        #[clap(value_enum, default_value = "bash")]
        shell: Shell,
    },
    /// Generate shell completion scripts
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
    /// Merge duplicate records (run in the background by `init`)
    #[clap(hide = true)]
    Prune,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
