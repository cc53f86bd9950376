//! Prerequisites and install command implementations

use std::path::Path;

use colored::Colorize;

use super::open_session;
use crate::error::Result;

/// Run the prerequisites command
pub fn run_prerequisites(project: &Path, json: bool) -> Result<()> {
    let session = open_session(project)?;
    let prerequisites = session.prerequisites();

    if json {
        println!("{}", serde_json::to_string_pretty(&prerequisites)?);
        return Ok(());
    }

    println!("{}:", "Prerequisites".bold());
    for (label, ok) in [
        ("Build tools", prerequisites.build_tools_available),
        ("Dependency tool", prerequisites.package_available),
    ] {
        let value = if ok { "available".green() } else { "missing".yellow() };
        println!("  {label}: {value}");
    }
    Ok(())
}

/// Run the install command
pub fn run_install(project: &Path) -> Result<()> {
    let session = open_session(project)?;
    if session.prerequisites().package_available {
        println!("Dependency tool already installed");
        return Ok(());
    }

    session.install_tool()?;
    println!("{} dependency tool", "Installed".green().bold());
    Ok(())
}
