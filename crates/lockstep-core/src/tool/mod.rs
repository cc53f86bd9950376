//! The external dependency-management tool
//!
//! The core never resolves or installs dependencies itself. It asks the tool
//! what an action would do, launches snapshots, and bootstraps projects. It
//! can also install the tool when it is missing.

mod command;

pub use command::CommandTool;

use std::path::Path;

use crate::Result;
use crate::action::ActionKind;
use crate::process::ToolCommand;
use crate::status::ToolOptions;

/// Opaque action descriptors, passed through to callers unmodified.
pub type PendingActions = Vec<serde_json::Value>;

/// Calls the core makes into the dependency tool.
pub trait DependencyTool {
    /// Whether a supported version of the tool is installed.
    fn is_available(&self) -> bool;

    /// Whether packages can be built from source on this machine.
    fn has_build_tools(&self) -> bool;

    /// Install the tool itself. Runs synchronously.
    fn install(&self) -> Result<()>;

    /// Whether `project` is dependency-tracked.
    fn is_packified(&self, project: &Path) -> Result<bool>;

    /// Whether tracking mode is on for `project`.
    fn is_mode_on(&self, project: &Path) -> Result<bool>;

    /// The project's tool options.
    fn options(&self, project: &Path) -> Result<ToolOptions>;

    /// What running `action` on `project` would do. Empty when nothing is pending.
    fn pending_actions(&self, action: ActionKind, project: &Path) -> Result<PendingActions>;

    /// Command that snapshots `project`, for launch as a managed subprocess.
    fn snapshot_command(&self, project: &Path) -> Result<ToolCommand>;

    /// Put `dir` under dependency tracking. Runs synchronously.
    fn bootstrap(&self, dir: &Path, enter: bool, restart: bool) -> Result<()>;
}
