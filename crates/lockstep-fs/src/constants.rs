//! Well-known paths inside a tracked project.

use std::path::Path;

/// Default relative paths and file names used by a tracked project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The dependency tool's private directory (`packrat`)
    ToolDir,
    /// The lockfile name (`packrat.lock`)
    LockfileName,
    /// The lockfile, relative to the project root
    Lockfile,
    /// The installed-package library, relative to the project root
    Library,
    /// Per-package manifest file name inside the library (`DESCRIPTION`)
    PackageManifest,
    /// lockstep's own state directory (`.lockstep`)
    StateDir,
    /// Persisted hash state, relative to the project root
    StateFile,
    /// Project configuration, relative to the project root
    ConfigFile,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolDir => "packrat",
            Self::LockfileName => "packrat.lock",
            Self::Lockfile => "packrat/packrat.lock",
            Self::Library => "packrat/lib",
            Self::PackageManifest => "DESCRIPTION",
            Self::StateDir => ".lockstep",
            Self::StateFile => ".lockstep/state.json",
            Self::ConfigFile => ".lockstep/config.toml",
        }
    }
}

/// Library subdirectories managed by the host itself; changes inside them
/// never count as library changes.
pub const RESERVED_LIBRARY_DIRS: &[&str] = &["manipulate", "rstudio"];

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
