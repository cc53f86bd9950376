//! Hash-state reconciliation for lockstep
//!
//! Keeps a project's installed dependency library and its lockfile in sync
//! by tracking fingerprints of both and reacting when they drift:
//!
//! - **Hash views**: resolved, observed and computed fingerprints per entity
//! - **ReconciliationEngine**: decides between refreshing and auto-snapshotting
//! - **AutoSnapshotScheduler**: one snapshot subprocess at a time, with queued reruns
//! - **ActionLifecycleTracker**: suppresses reactions while the tool runs an action
//! - **ProjectSession**: per-project context that marshals events onto one thread
//!
//! # Architecture
//!
//! ```text
//!   watcher / tool callbacks / subprocess readers
//!                      |  ControlEvent (mpsc)
//!                ProjectSession
//!                      |
//!             ReconciliationEngine
//!        +-------------+--------------+
//!        |             |              |
//!  HashStateStore  Scheduler   LifecycleTracker
//!        |
//!    lockstep-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use lockstep_core::{ProjectSession, Result};
//! use std::path::Path;
//!
//! fn example() -> Result<()> {
//!     let mut session = ProjectSession::open(Path::new("."))?;
//!     let status = session.status();
//!     println!("needs action: {}", status.needs_action());
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod event;
pub mod hash;
pub mod process;
pub mod reconcile;
pub mod session;
pub mod signal;
pub mod status;
pub mod tool;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use action::ActionKind;
pub use config::{LayoutSection, LockstepConfig, ToolSection};
pub use error::{Error, Result};
pub use event::{ControlEvent, EventSender, FileChange, OutputStream, RunId};
pub use hash::{HashComputer, HashState, HashStateStore, TrackedEntity};
pub use process::{ProcessRunner, SubprocessRunner, ToolCommand};
pub use reconcile::{
    ActionLifecycleTracker, AutoSnapshotScheduler, ExitOutcome, Reaction, ReconciliationEngine,
    RequestOutcome, SchedulerState,
};
pub use session::ProjectSession;
pub use signal::{ChangeNotifier, LogNotifier};
pub use status::{BootstrapRequest, ProjectStatus, ToolContext, ToolOptions, ToolPrerequisites};
pub use tool::{CommandTool, DependencyTool, PendingActions};
pub use watcher::{ChangeClassifier, ChangeSource, NotifyWatcher};
