//! Hashes command implementation

use std::path::Path;

use colored::Colorize;
use lockstep_core::{HashState, HashStateStore, TrackedEntity};
use serde::Serialize;

use super::open_session;
use crate::error::Result;

/// The three views of one entity.
#[derive(Debug, Serialize)]
struct EntityHashes {
    entity: TrackedEntity,
    resolved: String,
    observed: String,
    computed: String,
}

impl EntityHashes {
    fn read(hashes: &HashStateStore, entity: TrackedEntity) -> Self {
        Self {
            entity,
            resolved: hashes.get(entity, HashState::Resolved),
            observed: hashes.get(entity, HashState::Observed),
            computed: hashes.get(entity, HashState::Computed),
        }
    }
}

/// Run the hashes command
pub fn run_hashes(project: &Path, json: bool) -> Result<()> {
    let session = open_session(project)?;
    let hashes = session.engine().hashes();
    let report: Vec<EntityHashes> = TrackedEntity::ALL
        .into_iter()
        .map(|entity| EntityHashes::read(hashes, entity))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for entry in &report {
        let marker = if entry.resolved == entry.computed {
            "in sync".green()
        } else {
            "drifted".yellow()
        };
        println!("{} ({})", entry.entity.to_string().bold(), marker);
        println!("  {}: {}", "resolved".dimmed(), display_hash(&entry.resolved));
        println!("  {}: {}", "observed".dimmed(), display_hash(&entry.observed));
        println!("  {}: {}", "computed".dimmed(), display_hash(&entry.computed));
    }
    Ok(())
}

fn display_hash(hash: &str) -> &str {
    if hash.is_empty() { "(none)" } else { hash }
}
