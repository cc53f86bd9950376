//! Status command implementation

use std::path::Path;

use colored::Colorize;
use lockstep_core::{PendingActions, ProjectStatus};

use super::open_session;
use crate::error::Result;

/// Run the status command
pub fn run_status(project: &Path, json: bool) -> Result<()> {
    let mut session = open_session(project)?;
    let status = session.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    print_status(session.layout().root(), &status);
    Ok(())
}

fn print_status(root: &Path, status: &ProjectStatus) {
    println!("{}", "Project Status".bold());
    println!();
    println!("{}:   {}", "Path".dimmed(), root.display());
    println!();

    println!("{}:", "Context".bold());
    flag("Tool available", status.context.available);
    flag("Applicable", status.context.applicable);
    flag("Tracked", status.context.packified);
    flag("Mode on", status.context.mode_on);
    println!();

    if !status.context.packified {
        println!(
            "{} (run {} to start tracking)",
            "Not tracked".yellow(),
            "lockstep bootstrap".cyan()
        );
        return;
    }

    println!("{}:", "Options".bold());
    flag("Auto snapshot", status.options.auto_snapshot);
    flag("Ignore library in VCS", status.options.vcs_ignore_lib);
    flag("Ignore sources in VCS", status.options.vcs_ignore_src);
    println!();

    actions("Pending restore", &status.restore_actions);
    actions("Pending snapshot", &status.snapshot_actions);
    actions("Pending clean", &status.clean_actions);

    if !status.needs_action() {
        println!("{}", "Library and lockfile in sync".green());
    }
}

fn flag(label: &str, value: bool) {
    let value = if value { "yes".green() } else { "no".dimmed() };
    println!("  {label}: {value}");
}

fn actions(label: &str, list: &PendingActions) {
    if list.is_empty() {
        return;
    }
    println!("{} ({}):", label.bold(), list.len());
    for action in list {
        println!("  {} {}", "-".yellow(), action);
    }
    println!();
}
