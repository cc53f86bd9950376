//! Events marshaled onto a project's control thread
//!
//! Watchers, subprocess readers and tool callbacks run on arbitrary threads.
//! They never touch reconciliation state directly; they send a
//! [`ControlEvent`] and the owning [`ProjectSession`](crate::ProjectSession)
//! applies it.

use std::path::PathBuf;
use std::sync::mpsc;

/// Identifier of one managed subprocess run.
pub type RunId = u64;

/// Handle for delivering events to a project's control thread.
pub type EventSender = mpsc::Sender<ControlEvent>;

/// Which output channel a subprocess line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// A raw file-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Work item for a project's control thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A batch of file changes from a watcher
    FilesChanged(Vec<FileChange>),
    /// The dependency tool started or finished an action
    ActionLifecycle {
        project: PathBuf,
        action: String,
        running: bool,
    },
    /// One line of output from a managed subprocess
    ProcessOutput {
        run: RunId,
        stream: OutputStream,
        line: String,
    },
    /// A managed subprocess exited; `code` is -1 when no exit code exists
    ProcessExited { run: RunId, code: i32 },
    /// Stop the control loop
    Shutdown,
}
