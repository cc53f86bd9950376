//! Classification of raw file changes and the `notify` bridge

use std::path::{Path, PathBuf};

use lockstep_fs::{ProjectLayout, canonicalize_lossy};
use lockstep_fs::constants::ProjectPath;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::Result;
use crate::event::{ControlEvent, EventSender, FileChange};
use crate::hash::TrackedEntity;

/// Maps changed paths to the entity they affect.
///
/// - the lockfile matches on file name alone, wherever it lives
/// - library changes are directories or `DESCRIPTION` files under the
///   library root
/// - reserved library subdirectories and their direct children are ignored
#[derive(Debug, Clone)]
pub struct ChangeClassifier {
    lockfile_name: String,
    library: PathBuf,
    /// The library under the resolved project root, as native watchers report it
    resolved_library: PathBuf,
    reserved: Vec<String>,
}

impl ChangeClassifier {
    pub fn new(layout: &ProjectLayout) -> Self {
        let library = layout.library_path();
        let resolved_library = match library.strip_prefix(layout.root()) {
            Ok(relative) => canonicalize_lossy(layout.root()).join(relative),
            Err(_) => canonicalize_lossy(library),
        };
        Self {
            lockfile_name: layout.lockfile_name().to_string(),
            library: library.to_path_buf(),
            resolved_library,
            reserved: layout.reserved_dirs().to_vec(),
        }
    }

    pub fn classify(&self, path: &Path) -> Option<TrackedEntity> {
        let name = path.file_name().and_then(|n| n.to_str());

        if name == Some(self.lockfile_name.as_str()) {
            return Some(TrackedEntity::Lockfile);
        }

        if !(path.starts_with(&self.library) || path.starts_with(&self.resolved_library)) {
            return None;
        }
        if !(path.is_dir() || name == Some(ProjectPath::PackageManifest.as_str())) {
            return None;
        }

        let parent = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        if [name, parent]
            .into_iter()
            .flatten()
            .any(|n| self.reserved.iter().any(|r| r == n))
        {
            return None;
        }

        Some(TrackedEntity::Library)
    }

    /// Entities touched by a batch, each at most once, lockfile first.
    ///
    /// Arrival order inside a batch is not kept. A lockfile edit in the same
    /// batch as a library change marks the lockfile unresolved before the
    /// library is checked, so that batch notifies instead of snapshotting.
    pub fn classify_batch(&self, changes: &[FileChange]) -> Vec<TrackedEntity> {
        let mut hits: Vec<TrackedEntity> = changes
            .iter()
            .filter_map(|change| self.classify(&change.path))
            .collect();
        hits.sort_by_key(|entity| *entity == TrackedEntity::Library);
        hits.dedup();
        hits
    }
}

/// A producer of file-change batches for one project.
pub trait ChangeSource {
    /// Start delivering [`ControlEvent::FilesChanged`] batches to `events`.
    fn subscribe(&mut self, events: EventSender) -> Result<()>;
}

/// [`ChangeSource`] watching a directory tree with `notify`.
pub struct NotifyWatcher {
    root: PathBuf,
    watcher: Option<RecommendedWatcher>,
}

impl NotifyWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            watcher: None,
        }
    }
}

impl ChangeSource for NotifyWatcher {
    fn subscribe(&mut self, events: EventSender) -> Result<()> {
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if let Some(batch) = to_batch(event) {
                        let _ = events.send(ControlEvent::FilesChanged(batch));
                    }
                }
                Err(e) => tracing::error!("File watch error: {}", e),
            },
            notify::Config::default(),
        )?;

        watcher.watch(&self.root, RecursiveMode::Recursive)?;
        tracing::info!(root = %self.root.display(), "Watching project");
        self.watcher = Some(watcher);
        Ok(())
    }
}

fn to_batch(event: Event) -> Option<Vec<FileChange>> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {
            let batch: Vec<FileChange> = event.paths.into_iter().map(FileChange::new).collect();
            (!batch.is_empty()).then_some(batch)
        }
        _ => None,
    }
}
