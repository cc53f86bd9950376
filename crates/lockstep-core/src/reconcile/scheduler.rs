//! Auto-snapshot scheduling
//!
//! At most one snapshot subprocess runs per project. A request for the hash
//! already being snapshotted is absorbed; a request for a different hash is
//! counted and serviced once the current run succeeds, against whatever the
//! library hash is at that point.

use std::fmt;

use crate::Result;
use crate::event::RunId;

/// Scheduler state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running { run: RunId, target: String },
    RunningWithPending {
        run: RunId,
        target: String,
        pending: u32,
    },
}

impl SchedulerState {
    /// The in-flight run, if any.
    pub fn run(&self) -> Option<RunId> {
        match self {
            Self::Idle => None,
            Self::Running { run, .. } | Self::RunningWithPending { run, .. } => Some(*run),
        }
    }

    /// Hash the in-flight run is snapshotting.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Running { target, .. } | Self::RunningWithPending { target, .. } => {
                Some(target)
            }
        }
    }

    pub fn pending(&self) -> u32 {
        match self {
            Self::RunningWithPending { pending, .. } => *pending,
            _ => 0,
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running { run, target } => write!(f, "running #{run} ({target})"),
            Self::RunningWithPending {
                run,
                target,
                pending,
            } => write!(f, "running #{run} ({target}), {pending} pending"),
        }
    }
}

/// Result of [`AutoSnapshotScheduler::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new run was launched
    Started(RunId),
    /// The in-flight run already targets this hash
    Absorbed,
    /// Queued behind the in-flight run; carries the pending count
    Queued(u32),
    /// The launch failed and the scheduler stayed idle
    LaunchFailed,
}

/// What the engine must do after a run exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Not the current run
    Stale,
    /// Non-zero exit. Nothing is resolved.
    Failed,
    /// Successful with nothing queued: resolve the snapshot
    Resolve,
    /// Successful with requests queued: request again with a fresh hash
    Rerun,
}

/// Single-run snapshot state machine.
#[derive(Debug, Default)]
pub struct AutoSnapshotScheduler {
    state: SchedulerState,
    last_run: RunId,
}

impl AutoSnapshotScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.state.run()
    }

    /// Request a snapshot of the library as of `hash`.
    ///
    /// `launch` is only called when the scheduler is idle. It receives the
    /// id of the new run and must start exactly one subprocess for it.
    pub fn request<F>(&mut self, hash: &str, launch: F) -> RequestOutcome
    where
        F: FnOnce(RunId) -> Result<()>,
    {
        if let Some(current) = self.state.target()
            && current == hash
        {
            tracing::debug!(hash, "Snapshot already running");
            return RequestOutcome::Absorbed;
        }

        match &mut self.state {
            SchedulerState::Idle => {
                let run = self.last_run + 1;
                self.last_run = run;
                match launch(run) {
                    Ok(()) => {
                        tracing::info!(run, hash, "Started auto snapshot");
                        self.state = SchedulerState::Running {
                            run,
                            target: hash.to_string(),
                        };
                        RequestOutcome::Started(run)
                    }
                    Err(e) => {
                        tracing::error!(run, hash, "Failed to start auto snapshot: {}", e);
                        RequestOutcome::LaunchFailed
                    }
                }
            }
            SchedulerState::Running { run, target } => {
                let run = *run;
                let target = std::mem::take(target);
                self.state = SchedulerState::RunningWithPending {
                    run,
                    target,
                    pending: 1,
                };
                tracing::debug!(run, hash, pending = 1, "Snapshot requested while running, queueing");
                RequestOutcome::Queued(1)
            }
            SchedulerState::RunningWithPending { run, pending, .. } => {
                *pending += 1;
                tracing::debug!(run = *run, hash, pending = *pending, "Snapshot requested while running, queueing");
                RequestOutcome::Queued(*pending)
            }
        }
    }

    /// Record that `run` exited with `code`.
    ///
    /// A successful exit returns the scheduler to idle either way; on
    /// [`ExitOutcome::Rerun`] the caller re-reads the library hash and calls
    /// [`request`](Self::request) again.
    pub fn on_exit(&mut self, run: RunId, code: i32) -> ExitOutcome {
        if self.state.run() != Some(run) {
            tracing::debug!(run, state = %self.state, "Ignoring exit of stale snapshot run");
            return ExitOutcome::Stale;
        }

        let pending = self.state.pending();
        self.state = SchedulerState::Idle;
        tracing::info!(run, code, "Finished auto snapshot");

        if code != 0 {
            ExitOutcome::Failed
        } else if pending > 0 {
            tracing::debug!(run, pending, "Executing pending snapshot");
            ExitOutcome::Rerun
        } else {
            ExitOutcome::Resolve
        }
    }
}
