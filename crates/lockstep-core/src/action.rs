//! Externally-run dependency actions

use crate::hash::TrackedEntity;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action the external dependency tool can run against a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Update the lockfile to match the installed library
    Snapshot,
    /// Update the installed library to match the lockfile
    Restore,
    /// Remove installed packages the lockfile does not reference
    Clean,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Restore => "restore",
            Self::Clean => "clean",
        }
    }

    /// The entity whose drift this action reconciles, if any.
    ///
    /// Clean does not reconcile either view.
    pub fn entity(&self) -> Option<TrackedEntity> {
        match self {
            Self::Snapshot => Some(TrackedEntity::Library),
            Self::Restore => Some(TrackedEntity::Lockfile),
            Self::Clean => None,
        }
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "snapshot" => Ok(Self::Snapshot),
            "restore" => Ok(Self::Restore),
            "clean" => Ok(Self::Clean),
            other => Err(Error::UnknownAction {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
