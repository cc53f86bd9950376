//! Check command implementation

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use lockstep_core::{HashState, Reaction, RequestOutcome, TrackedEntity};

use super::open_session;
use crate::error::{CliError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the check command
pub fn run_check(project: &Path) -> Result<()> {
    let mut session = open_session(project)?;
    let mut launched = false;

    for entity in TrackedEntity::ALL {
        let reaction = session.engine_mut().check_and_notify(entity);
        let message = match reaction {
            Reaction::Unchanged => "unchanged".dimmed(),
            Reaction::Notified => "changed".yellow(),
            Reaction::Snapshot(RequestOutcome::Started(_)) => {
                launched = true;
                "changed, snapshot started".yellow()
            }
            Reaction::Snapshot(RequestOutcome::LaunchFailed) => {
                return Err(CliError::user("Failed to start snapshot"));
            }
            Reaction::Snapshot(_) | Reaction::Dropped | Reaction::Suppressed => {
                "skipped".dimmed()
            }
        };
        println!("{}: {}", entity.to_string().bold(), message);
    }

    if !launched {
        return Ok(());
    }

    // No timeout: a snapshot runs as long as the tool needs
    while !session.engine().scheduler().is_idle() {
        session.process_next(POLL_INTERVAL);
    }

    let hashes = session.engine().hashes();
    let library = TrackedEntity::Library;
    if hashes.get(library, HashState::Resolved) != hashes.get(library, HashState::Computed) {
        println!("{}", "Snapshot finished; actions still pending".yellow());
    } else {
        println!("{}", "Snapshot finished".green());
    }
    Ok(())
}
