//! Three-view hash tracking for the lockfile and the library
//!
//! Each tracked entity has three fingerprint views:
//!
//! - **Resolved**: the state last known to be consistent (after a snapshot
//!   or restore with nothing left pending). Persisted.
//! - **Observed**: the state last reported outward to the UI. Persisted.
//! - **Computed**: the current on-disk state. Derived on demand, never stored.
//!
//! Computed != Observed means the UI view is stale. Observed != Resolved
//! means the entity changed since the last reconciling action.

mod computer;
mod store;

pub use computer::HashComputer;
pub use store::HashStateStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistence scope for all hash views.
pub const STATE_SCOPE: &str = "packrat";

/// The two things whose drift is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedEntity {
    Lockfile,
    Library,
}

impl TrackedEntity {
    pub const ALL: [TrackedEntity; 2] = [TrackedEntity::Lockfile, TrackedEntity::Library];
}

impl fmt::Display for TrackedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lockfile => f.write_str("lockfile"),
            Self::Library => f.write_str("library"),
        }
    }
}

/// One of the three views of an entity's fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashState {
    Resolved,
    Observed,
    Computed,
}

impl fmt::Display for HashState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => f.write_str("resolved"),
            Self::Observed => f.write_str("observed"),
            Self::Computed => f.write_str("computed"),
        }
    }
}

/// Storage key for a persisted view, e.g. `packratLockfileObserved`.
///
/// Returns `None` for [`HashState::Computed`], which is never stored.
pub fn storage_key(entity: TrackedEntity, state: HashState) -> Option<String> {
    let entity = match entity {
        TrackedEntity::Lockfile => "Lockfile",
        TrackedEntity::Library => "Library",
    };
    let state = match state {
        HashState::Resolved => "Resolved",
        HashState::Observed => "Observed",
        HashState::Computed => return None,
    };
    Some(format!("{STATE_SCOPE}{entity}{state}"))
}
