//! Fingerprints of the lockfile and the installed library

use lockstep_fs::constants::ProjectPath;
use lockstep_fs::{ProjectLayout, compute_content_checksum};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use super::TrackedEntity;

/// Derives the computed view of each tracked entity from disk.
///
/// Never fails: unreadable files are logged and contribute nothing, and an
/// absent entity fingerprints as the empty string.
#[derive(Debug, Clone)]
pub struct HashComputer {
    lockfile: PathBuf,
    library: PathBuf,
}

impl HashComputer {
    pub fn new(layout: &ProjectLayout) -> Self {
        Self {
            lockfile: layout.lockfile_path().to_path_buf(),
            library: layout.library_path().to_path_buf(),
        }
    }

    pub fn hash(&self, entity: TrackedEntity) -> String {
        match entity {
            TrackedEntity::Lockfile => self.lockfile_hash(),
            TrackedEntity::Library => self.library_hash(),
        }
    }

    /// Fingerprint of every `DESCRIPTION` file in the library.
    ///
    /// The tree is walked depth-first with each directory's entries sorted
    /// by file name, so an unchanged tree always concatenates its manifests
    /// in the same order.
    pub fn library_hash(&self) -> String {
        if !self.library.is_dir() {
            return String::new();
        }

        let manifest = ProjectPath::PackageManifest.as_str();
        let mut content = Vec::new();

        for entry in WalkDir::new(&self.library).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable library entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() || entry.file_name() != manifest {
                continue;
            }

            match fs::read(entry.path()) {
                Ok(bytes) => content.extend_from_slice(&bytes),
                Err(e) => {
                    tracing::warn!(path = ?entry.path(), "Failed to read package manifest: {}", e)
                }
            }
        }

        if content.is_empty() {
            return String::new();
        }
        compute_content_checksum(&content)
    }

    /// Fingerprint of the raw lockfile bytes, or empty if there is no lockfile.
    pub fn lockfile_hash(&self) -> String {
        if !self.lockfile.exists() {
            return String::new();
        }

        match fs::read(&self.lockfile) {
            Ok(bytes) => compute_content_checksum(&bytes),
            Err(e) => {
                tracing::error!(path = ?self.lockfile, "Failed to read lockfile: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_test_utils::TestProject;

    fn computer(project: &TestProject) -> HashComputer {
        HashComputer::new(&ProjectLayout::new(project.root()))
    }

    #[test]
    fn no_lockfile_hashes_empty() {
        let project = TestProject::new();
        assert_eq!(computer(&project).lockfile_hash(), "");
    }

    #[test]
    fn lockfile_hash_is_checksum_of_bytes() {
        let project = TestProject::new();
        project.write_lockfile("X");
        assert_eq!(computer(&project).lockfile_hash(), compute_content_checksum(b"X"));
    }

    #[test]
    fn empty_or_missing_library_hashes_empty() {
        let project = TestProject::new();
        assert_eq!(computer(&project).library_hash(), "");

        project.create_library();
        assert_eq!(computer(&project).library_hash(), "");
    }

    #[test]
    fn library_hash_concatenates_manifests_in_name_order() {
        let project = TestProject::new();
        project.install_package("zoo", "Package: zoo\n");
        project.install_package("abc", "Package: abc\n");

        let expected = compute_content_checksum(b"Package: abc\nPackage: zoo\n");
        assert_eq!(computer(&project).library_hash(), expected);
    }

    #[test]
    fn library_hash_ignores_other_files_and_finds_nested_manifests() {
        let project = TestProject::new();
        project.install_package("abc", "Package: abc\n");
        let base = computer(&project).library_hash();

        project.write_library_file("abc/NAMESPACE", "export(f)\n");
        assert_eq!(computer(&project).library_hash(), base);

        project.write_library_file("abc/sub/DESCRIPTION", "Nested\n");
        assert_eq!(
            computer(&project).library_hash(),
            compute_content_checksum(b"Package: abc\nNested\n")
        );
    }

    #[test]
    fn library_hash_is_deterministic() {
        let project = TestProject::new();
        for name in ["b", "a", "c", "aa"] {
            project.install_package(name, &format!("Package: {name}\n"));
        }

        let computer = computer(&project);
        let first = computer.library_hash();
        assert!(!first.is_empty());
        for _ in 0..5 {
            assert_eq!(computer.library_hash(), first);
        }
    }

    #[test]
    fn hash_dispatches_by_entity() {
        let project = TestProject::new();
        project.write_lockfile("lock");
        project.install_package("pkg", "Package: pkg\n");
        let computer = computer(&project);

        assert_eq!(computer.hash(TrackedEntity::Lockfile), computer.lockfile_hash());
        assert_eq!(computer.hash(TrackedEntity::Library), computer.library_hash());
    }
}
