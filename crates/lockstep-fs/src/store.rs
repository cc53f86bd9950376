//! Project-scoped persistent key/value storage
//!
//! Values are grouped by scope (`"packrat"` for hash views) and persisted as a
//! two-level JSON object. Entries are created lazily on first write and are
//! never deleted.

use crate::{Error, Result, io};
use fs2::FileExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

type Scopes = BTreeMap<String, BTreeMap<String, Value>>;

/// Persistent string storage scoped to a single project.
pub trait PersistentStore {
    /// Read a stored string. Missing entries and non-string values read as `None`.
    fn get(&self, scope: &str, key: &str) -> Option<String>;

    /// Store a string, persisting it before returning.
    fn put(&mut self, scope: &str, key: &str, value: &str) -> Result<()>;
}

/// JSON-file backed store, typically `<project>/.lockstep/state.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    scopes: Scopes,
}

impl FileStore {
    /// Open the store at `path`, loading existing content if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, locked, or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let scopes = if path.exists() {
            Self::load(&path)?
        } else {
            Scopes::new()
        };
        Ok(Self { path, scopes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Scopes> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        file.lock_shared().map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

        // Read through the locked handle
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| Error::io(path, e))?;

        if content.trim().is_empty() {
            return Ok(Scopes::new());
        }

        serde_json::from_str(&content).map_err(|e| Error::StateParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn save(&self, scopes: &Scopes) -> Result<()> {
        let content =
            serde_json::to_string_pretty(scopes).map_err(|e| Error::StateSerialize {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        io::write_atomic(&self.path, content.as_bytes())
    }
}

impl PersistentStore for FileStore {
    fn get(&self, scope: &str, key: &str) -> Option<String> {
        lookup(&self.scopes, scope, key)
    }

    fn put(&mut self, scope: &str, key: &str, value: &str) -> Result<()> {
        // Only commit what reached disk
        let mut scopes = self.scopes.clone();
        insert(&mut scopes, scope, key, value);
        self.save(&scopes)?;
        self.scopes = scopes;
        Ok(())
    }
}

/// In-memory store for sessions without a writable project directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    scopes: Scopes,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, scope: &str, key: &str) -> Option<String> {
        lookup(&self.scopes, scope, key)
    }

    fn put(&mut self, scope: &str, key: &str, value: &str) -> Result<()> {
        insert(&mut self.scopes, scope, key, value);
        Ok(())
    }
}

fn lookup(scopes: &Scopes, scope: &str, key: &str) -> Option<String> {
    match scopes.get(scope)?.get(key)? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn insert(scopes: &mut Scopes, scope: &str, key: &str, value: &str) {
    scopes
        .entry(scope.to_string())
        .or_default()
        .insert(key.to_string(), Value::String(value.to_string()));
}
