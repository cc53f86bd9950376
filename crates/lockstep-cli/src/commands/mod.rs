//! Command implementations for lockstep-cli

pub mod bootstrap;
pub mod check;
pub mod hashes;
pub mod prerequisites;
pub mod status;
pub mod watch;

pub use bootstrap::run_bootstrap;
pub use check::run_check;
pub use hashes::run_hashes;
pub use prerequisites::{run_install, run_prerequisites};
pub use status::run_status;
pub use watch::run_watch;

use std::path::Path;

use lockstep_core::ProjectSession;
use lockstep_fs::canonicalize_lossy;

use crate::error::{CliError, Result};

/// Open a session, rejecting paths that are not directories.
pub(crate) fn open_session(project: &Path) -> Result<ProjectSession> {
    if !project.is_dir() {
        return Err(CliError::user(format!(
            "Project directory not found: {}",
            project.display()
        )));
    }
    Ok(ProjectSession::open(&canonicalize_lossy(project))?)
}
