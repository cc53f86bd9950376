//! lockstep CLI
//!
//! Inspect and reconcile a project's dependency lockfile and library.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }

    let project = cli.project.as_path();
    match cli.command {
        Commands::Status { json } => commands::run_status(project, json),
        Commands::Hashes { json } => commands::run_hashes(project, json),
        Commands::Check => commands::run_check(project),
        Commands::Watch => commands::run_watch(project),
        Commands::Prerequisites { json } => commands::run_prerequisites(project, json),
        Commands::Install => commands::run_install(project),
        Commands::Bootstrap { dir, enter } => commands::run_bootstrap(project, dir, enter),
    }
}
