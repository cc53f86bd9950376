//! Tracking of actions run by the dependency tool

use std::path::{Path, PathBuf};

use lockstep_fs::paths_equal;

use crate::action::ActionKind;
use crate::hash::TrackedEntity;

/// The action currently reported as running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningAction {
    /// Name as reported by the tool
    pub name: String,
    /// `None` for names outside snapshot/restore/clean
    pub kind: Option<ActionKind>,
}

/// Records start and stop of tool actions for one project.
///
/// Holds a single slot. An action starting while another is recorded
/// replaces it and logs a warning.
#[derive(Debug)]
pub struct ActionLifecycleTracker {
    project: PathBuf,
    running: Option<RunningAction>,
}

impl ActionLifecycleTracker {
    pub fn new(project: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            running: None,
        }
    }

    pub fn running(&self) -> Option<&RunningAction> {
        self.running.as_ref()
    }

    /// Whether file-driven reactions are currently suppressed.
    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// Apply a lifecycle notification.
    ///
    /// Returns the action and entity to resolve when a recognised action
    /// that maps to an entity stops.
    pub fn on_action_event(
        &mut self,
        project: &Path,
        name: &str,
        running: bool,
    ) -> Option<(ActionKind, TrackedEntity)> {
        if !paths_equal(&self.project, project) {
            tracing::debug!(
                project = %project.display(),
                "Ignoring action '{}' for another project",
                name
            );
            return None;
        }

        if running {
            if let Some(current) = &self.running {
                tracing::warn!(
                    "'{}' executed while action '{}' was already running",
                    name,
                    current.name
                );
            }
            tracing::info!("Action '{}' started", name);
            self.running = Some(RunningAction {
                name: name.to_string(),
                kind: name.parse().ok(),
            });
            return None;
        }

        tracing::info!("Action '{}' finished", name);
        let completed = self.running.take()?;
        let kind = completed.kind?;
        Some((kind, kind.entity()?))
    }
}
