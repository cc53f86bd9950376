//! Bootstrap command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use lockstep_core::BootstrapRequest;

use super::open_session;
use crate::error::Result;

/// Run the bootstrap command
pub fn run_bootstrap(project: &Path, dir: PathBuf, enter: bool) -> Result<()> {
    let mut session = open_session(project)?;
    session.bootstrap(&BootstrapRequest { dir, enter })?;

    println!("{} {}", "Bootstrapped".green().bold(), session.layout().root().display());
    Ok(())
}
