//! Reactions to drift between the hash views

use std::path::{Path, PathBuf};

use super::guard::ReentrancyGuard;
use super::lifecycle::ActionLifecycleTracker;
use super::scheduler::{AutoSnapshotScheduler, ExitOutcome, RequestOutcome};
use crate::action::ActionKind;
use crate::event::{EventSender, RunId};
use crate::hash::{HashState, HashStateStore, TrackedEntity};
use crate::process::ProcessRunner;
use crate::signal::ChangeNotifier;
use crate::status::ProjectStatus;
use crate::tool::{DependencyTool, PendingActions};

/// How [`ReconciliationEngine::check_and_notify`] reacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// A check was already executing on this thread
    Dropped,
    /// A tool action is running
    Suppressed,
    /// Observed and computed views agree
    Unchanged,
    /// The refresh signal was emitted
    Notified,
    /// An auto snapshot was requested
    Snapshot(RequestOutcome),
}

/// Per-project reconciliation state.
///
/// Owns the hash views, the snapshot scheduler and the action tracker. All
/// methods run on the project's control thread.
pub struct ReconciliationEngine {
    project: PathBuf,
    hashes: HashStateStore,
    scheduler: AutoSnapshotScheduler,
    lifecycle: ActionLifecycleTracker,
    tool: Box<dyn DependencyTool>,
    runner: Box<dyn ProcessRunner>,
    notifier: Box<dyn ChangeNotifier>,
    events: EventSender,
    guard: ReentrancyGuard,
}

impl ReconciliationEngine {
    pub fn new(
        project: impl Into<PathBuf>,
        hashes: HashStateStore,
        tool: Box<dyn DependencyTool>,
        runner: Box<dyn ProcessRunner>,
        notifier: Box<dyn ChangeNotifier>,
        events: EventSender,
    ) -> Self {
        let project = project.into();
        Self {
            lifecycle: ActionLifecycleTracker::new(&project),
            project,
            hashes,
            scheduler: AutoSnapshotScheduler::new(),
            tool,
            runner,
            notifier,
            events,
            guard: ReentrancyGuard::new(),
        }
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn hashes(&self) -> &HashStateStore {
        &self.hashes
    }

    pub fn scheduler(&self) -> &AutoSnapshotScheduler {
        &self.scheduler
    }

    pub fn lifecycle(&self) -> &ActionLifecycleTracker {
        &self.lifecycle
    }

    pub fn tool(&self) -> &dyn DependencyTool {
        self.tool.as_ref()
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// React to a possible change of `entity`.
    ///
    /// When the observed view differs from disk it is updated, then a
    /// lockfile change emits the refresh signal and a library change
    /// requests an auto snapshot. A library change while a restore is
    /// outstanding only refreshes.
    pub fn check_and_notify(&mut self, entity: TrackedEntity) -> Reaction {
        let Some(_scope) = self.guard.enter() else {
            return Reaction::Dropped;
        };

        if let Some(action) = self.lifecycle.running() {
            tracing::debug!(%entity, "Ignoring change while '{}' is running", action.name);
            return Reaction::Suppressed;
        }

        let observed = self.hashes.get(entity, HashState::Observed);
        let computed = self.hashes.get(entity, HashState::Computed);
        if observed == computed {
            return Reaction::Unchanged;
        }

        tracing::debug!(%entity, observed = %observed, computed = %computed, "Detected change");
        self.record(entity, HashState::Observed, &computed);

        match entity {
            TrackedEntity::Lockfile => {
                self.notifier.installed_packages_changed();
                Reaction::Notified
            }
            TrackedEntity::Library if self.hashes.is_unresolved(TrackedEntity::Lockfile) => {
                tracing::debug!(
                    observed = %self.hashes.get(TrackedEntity::Lockfile, HashState::Observed),
                    resolved = %self.hashes.get(TrackedEntity::Lockfile, HashState::Resolved),
                    "Lockfile unresolved, skipping auto snapshot"
                );
                self.notifier.installed_packages_changed();
                Reaction::Notified
            }
            TrackedEntity::Library => Reaction::Snapshot(self.request_snapshot(&computed)),
        }
    }

    /// Fill `status` with the pending actions for the current state.
    ///
    /// Observed views are brought up to date first. Snapshot actions are
    /// only fetched for a dirty library and restore actions for a dirty
    /// lockfile. Clean actions are always fetched.
    pub fn annotate(&mut self, status: &mut ProjectStatus) {
        for entity in TrackedEntity::ALL {
            if let Err(e) = self.hashes.update_observed(entity) {
                tracing::error!(%entity, "Failed to persist observed hash: {}", e);
            }
        }

        if self.is_dirty(TrackedEntity::Library) {
            status.snapshot_actions = self.pending_actions(ActionKind::Snapshot);
        }
        if self.is_dirty(TrackedEntity::Lockfile) {
            status.restore_actions = self.pending_actions(ActionKind::Restore);
        }
        status.clean_actions = self.pending_actions(ActionKind::Clean);
    }

    /// Settle state once `action` has completed.
    ///
    /// Emits the refresh signal if `entity` moved since it was last
    /// observed. If the tool reports nothing further to do for `action`,
    /// both entities are marked resolved at their current hashes.
    pub fn resolve_after(&mut self, action: ActionKind, entity: TrackedEntity) {
        let observed = self.hashes.get(entity, HashState::Observed);
        if observed != self.hashes.get(entity, HashState::Computed) {
            self.notifier.installed_packages_changed();
        }

        if !self.pending_actions(action).is_empty() {
            tracing::debug!(%action, "Actions still pending, leaving state unresolved");
            return;
        }

        for entity in TrackedEntity::ALL {
            if let Err(e) = self.hashes.update(entity, HashState::Resolved) {
                tracing::error!(%entity, "Failed to persist resolved hash: {}", e);
            }
        }
        tracing::info!(%action, "Resolved dependency state");
    }

    /// Apply a lifecycle notification from the dependency tool.
    pub fn on_action_event(&mut self, project: &Path, name: &str, running: bool) {
        if let Some((action, entity)) = self.lifecycle.on_action_event(project, name, running) {
            self.resolve_after(action, entity);
        }
    }

    /// Apply the exit of a snapshot subprocess.
    pub fn on_process_exited(&mut self, run: RunId, code: i32) -> ExitOutcome {
        let outcome = self.scheduler.on_exit(run, code);
        match outcome {
            ExitOutcome::Stale => {}
            ExitOutcome::Failed => {
                tracing::warn!(run, code, "Auto snapshot failed");
            }
            ExitOutcome::Resolve => {
                self.resolve_after(ActionKind::Snapshot, TrackedEntity::Library);
            }
            ExitOutcome::Rerun => {
                let hash = self.hashes.get(TrackedEntity::Library, HashState::Computed);
                self.request_snapshot(&hash);
            }
        }
        outcome
    }

    fn request_snapshot(&mut self, hash: &str) -> RequestOutcome {
        let Self {
            scheduler,
            tool,
            runner,
            events,
            project,
            ..
        } = self;

        scheduler.request(hash, |run| {
            let command = tool.snapshot_command(project.as_path())?;
            runner.start(run, command, events.clone())
        })
    }

    fn is_dirty(&self, entity: TrackedEntity) -> bool {
        self.hashes.get(entity, HashState::Observed) != self.hashes.get(entity, HashState::Resolved)
    }

    /// Pending actions for `action`. Lookup failures read as none.
    fn pending_actions(&self, action: ActionKind) -> PendingActions {
        match self.tool.pending_actions(action, &self.project) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::error!(%action, "Failed to query pending actions: {}", e);
                Vec::new()
            }
        }
    }

    fn record(&mut self, entity: TrackedEntity, state: HashState, value: &str) {
        if let Err(e) = self.hashes.set_if_changed(entity, state, value) {
            tracing::error!(%entity, %state, "Failed to persist hash: {}", e);
        }
    }
}
