//! Status surface consumed by the RPC/UI layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tool::PendingActions;

/// Whether dependency tracking applies to the current project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContext {
    /// The dependency tool is installed at a supported version
    pub available: bool,
    /// The tool is available and a project is open
    pub applicable: bool,
    /// The project is dependency-tracked
    pub packified: bool,
    /// Tracking mode is on for the project
    pub mode_on: bool,
}

/// What installing the dependency tool needs, reported before offering it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPrerequisites {
    pub build_tools_available: bool,
    /// A supported version of the tool is already installed
    pub package_available: bool,
}

fn default_true() -> bool {
    true
}

/// Per-project tool options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOptions {
    #[serde(default = "default_true", alias = "auto.snapshot")]
    pub auto_snapshot: bool,
    #[serde(default = "default_true", alias = "vcs.ignore.lib")]
    pub vcs_ignore_lib: bool,
    #[serde(default, alias = "vcs.ignore.src")]
    pub vcs_ignore_src: bool,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            auto_snapshot: true,
            vcs_ignore_lib: true,
            vcs_ignore_src: false,
        }
    }
}

/// Request to put a directory under dependency tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapRequest {
    pub dir: PathBuf,
    /// Enter tracking mode once bootstrapped
    pub enter: bool,
}

/// Reconciliation status returned to callers.
///
/// Pending-action lists are opaque descriptors from the tool. The snapshot
/// list is only fetched when the library is dirty and the restore list only
/// when the lockfile is dirty; the clean list is always fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub context: ToolContext,
    pub options: ToolOptions,
    pub restore_actions: PendingActions,
    pub snapshot_actions: PendingActions,
    pub clean_actions: PendingActions,
}

impl ProjectStatus {
    /// Whether the tool reports anything for the user to act on.
    pub fn needs_action(&self) -> bool {
        !(self.restore_actions.is_empty()
            && self.snapshot_actions.is_empty()
            && self.clean_actions.is_empty())
    }
}
