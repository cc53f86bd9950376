//! [`TestProject`] builder for lockstep test scenarios.
//!
//! Uses the default layout: lockfile at `packrat/packrat.lock`, library at
//! `packrat/lib`, one directory per installed package holding a
//! `DESCRIPTION` file.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers for shaping its lockfile and
/// library.
///
/// # Example
///
/// ```rust,no_run
/// use lockstep_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_lockfile("PackratFormat: 1.4\n");
/// project.install_package("jsonlite", "Package: jsonlite\nVersion: 1.8.0\n");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn lockfile_path(&self) -> PathBuf {
        self.root().join("packrat/packrat.lock")
    }

    pub fn library_path(&self) -> PathBuf {
        self.root().join("packrat/lib")
    }

    /// Write (or overwrite) the lockfile.
    pub fn write_lockfile(&self, content: &str) {
        let path = self.lockfile_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_lockfile: {}: {e}", path.display()));
    }

    pub fn remove_lockfile(&self) {
        fs::remove_file(self.lockfile_path()).unwrap();
    }

    /// Create the library directory without installing anything.
    pub fn create_library(&self) {
        fs::create_dir_all(self.library_path()).unwrap();
    }

    /// Install a package by writing `<library>/<name>/DESCRIPTION`.
    ///
    /// Returns the path of the written manifest.
    pub fn install_package(&self, name: &str, description: &str) -> PathBuf {
        self.write_library_file(&format!("{name}/DESCRIPTION"), description)
    }

    /// Remove an installed package directory.
    pub fn remove_package(&self, name: &str) {
        fs::remove_dir_all(self.library_path().join(name))
            .unwrap_or_else(|e| panic!("remove_package: {name}: {e}"));
    }

    /// Write an arbitrary file relative to the library root.
    pub fn write_library_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.library_path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_library_file: {}: {e}", path.display()));
        path
    }

    /// Write `.lockstep/config.toml`.
    pub fn write_config(&self, content: &str) {
        let dir = self.root().join(".lockstep");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), content).unwrap();
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
