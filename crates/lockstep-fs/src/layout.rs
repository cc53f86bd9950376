//! Resolution of a tracked project's lockfile, library and state paths.

use crate::constants::{ProjectPath, RESERVED_LIBRARY_DIRS};
use std::path::{Path, PathBuf};

/// Absolute locations of everything lockstep watches or writes for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    lockfile: PathBuf,
    library: PathBuf,
    reserved: Vec<String>,
}

impl ProjectLayout {
    /// Layout with the default `packrat/packrat.lock` and `packrat/lib` paths.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            lockfile: root.join(ProjectPath::Lockfile),
            library: root.join(ProjectPath::Library),
            reserved: RESERVED_LIBRARY_DIRS.iter().map(|s| s.to_string()).collect(),
            root,
        }
    }

    /// Layout with custom lockfile and library locations.
    ///
    /// Relative paths are resolved against `root`.
    pub fn with_paths(
        root: impl Into<PathBuf>,
        lockfile: impl AsRef<Path>,
        library: impl AsRef<Path>,
        reserved: Vec<String>,
    ) -> Self {
        let root = root.into();
        Self {
            lockfile: root.join(lockfile),
            library: root.join(library),
            reserved,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lockfile_path(&self) -> &Path {
        &self.lockfile
    }

    /// File name of the lockfile; change events are matched on this name alone.
    pub fn lockfile_name(&self) -> &str {
        self.lockfile
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(ProjectPath::LockfileName.as_str())
    }

    pub fn library_path(&self) -> &Path {
        &self.library
    }

    /// Library subdirectory names excluded from change detection.
    pub fn reserved_dirs(&self) -> &[String] {
        &self.reserved
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(ProjectPath::StateFile)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(ProjectPath::ConfigFile)
    }

    /// Whether `other` refers to this project's root directory.
    pub fn is_project(&self, other: &Path) -> bool {
        paths_equal(&self.root, other)
    }
}

/// Resolve symlinks and relative components, keeping `path` as given when
/// it cannot be resolved.
pub fn canonicalize_lossy(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Compare two paths after resolving symlinks and relative components.
///
/// Falls back to a lexical comparison when either path cannot be resolved
/// (for example because it no longer exists).
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.components().eq(b.components()),
    }
}
