//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lockstep - Keep a project's dependency library and lockfile in sync
#[derive(Parser, Debug)]
#[command(name = "lockstep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory
    #[arg(short, long, global = true, env = "LOCKSTEP_PROJECT", default_value = ".")]
    pub project: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show tool context, options and pending actions
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show resolved, observed and computed hashes
    Hashes {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Check the lockfile and library once, snapshotting if needed
    Check,

    /// Watch the project and reconcile changes until interrupted
    Watch,

    /// Show whether the dependency tool can be installed
    Prerequisites {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Install the dependency tool if it is missing
    Install,

    /// Put a directory under dependency tracking
    ///
    /// Examples:
    ///   lockstep bootstrap             # Bootstrap the project directory
    ///   lockstep bootstrap sub --enter # Bootstrap sub/ and enter tracking mode
    Bootstrap {
        /// Directory to bootstrap, relative to the project
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Enter tracking mode afterwards
        #[arg(long)]
        enter: bool,
    },
}
