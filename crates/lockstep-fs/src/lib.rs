//! Filesystem layer for lockstep
//!
//! Provides change fingerprints, project layout resolution, atomic writes
//! and the project-scoped persistent key/value store.

pub mod checksum;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod store;

pub use checksum::{compute_content_checksum, compute_file_checksum};
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use layout::{ProjectLayout, canonicalize_lossy, paths_equal};
pub use store::{FileStore, MemoryStore, PersistentStore};
