//! Drift detection and resolution
//!
//! - [`ReconciliationEngine`] compares hash views and decides how to react
//! - [`AutoSnapshotScheduler`] keeps at most one snapshot subprocess running
//! - [`ActionLifecycleTracker`] follows actions run by the dependency tool
//! - [`ReentrancyGuard`] drops checks that re-enter themselves

mod engine;
mod guard;
mod lifecycle;
mod scheduler;

pub use engine::{Reaction, ReconciliationEngine};
pub use guard::{GuardScope, ReentrancyGuard};
pub use lifecycle::{ActionLifecycleTracker, RunningAction};
pub use scheduler::{AutoSnapshotScheduler, ExitOutcome, RequestOutcome, SchedulerState};
