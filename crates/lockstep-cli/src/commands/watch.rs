//! Watch command implementation

use std::path::Path;

use colored::Colorize;
use lockstep_core::{NotifyWatcher, ProjectSession};
use lockstep_fs::canonicalize_lossy;

use crate::error::{CliError, Result};

/// Run the watch command
pub fn run_watch(project: &Path) -> Result<()> {
    if !project.is_dir() {
        return Err(CliError::user(format!(
            "Project directory not found: {}",
            project.display()
        )));
    }

    let notifier = || println!("{}", "installed packages changed".cyan());
    let mut session =
        ProjectSession::open_with_notifier(&canonicalize_lossy(project), Box::new(notifier))?;
    let root = session.layout().root().to_path_buf();

    if !session.start_monitoring(Box::new(NotifyWatcher::new(&root)))? {
        if !session.context().mode_on {
            println!("{}; nothing to watch", "Tracking mode is off".yellow());
        } else {
            println!(
                "{} at {}; nothing to watch",
                "No lockfile".yellow(),
                session.layout().lockfile_path().display()
            );
        }
        return Ok(());
    }

    println!("Watching {} (Ctrl-C to stop)", root.display().to_string().cyan());
    session.run();
    Ok(())
}
