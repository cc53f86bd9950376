//! Persisted resolved/observed views plus the live computed view

use lockstep_fs::PersistentStore;

use super::{HashComputer, HashState, STATE_SCOPE, TrackedEntity, storage_key};
use crate::Result;

/// Reads and writes the three hash views of each tracked entity.
///
/// Resolved and observed views are persisted through a [`PersistentStore`];
/// the computed view is always recomputed by the [`HashComputer`].
pub struct HashStateStore {
    store: Box<dyn PersistentStore>,
    computer: HashComputer,
}

impl HashStateStore {
    pub fn new(store: Box<dyn PersistentStore>, computer: HashComputer) -> Self {
        Self { store, computer }
    }

    pub fn computer(&self) -> &HashComputer {
        &self.computer
    }

    /// Current value of a view. Unset persisted views read as empty.
    pub fn get(&self, entity: TrackedEntity, state: HashState) -> String {
        match storage_key(entity, state) {
            Some(key) => self.store.get(STATE_SCOPE, &key).unwrap_or_default(),
            None => self.computer.hash(entity),
        }
    }

    /// Persist `value` as the given view unless it is already stored.
    ///
    /// Returns whether a write happened. The computed view is never written.
    pub fn set_if_changed(
        &mut self,
        entity: TrackedEntity,
        state: HashState,
        value: &str,
    ) -> Result<bool> {
        let Some(key) = storage_key(entity, state) else {
            return Ok(false);
        };

        let old = self.store.get(STATE_SCOPE, &key).unwrap_or_default();
        if old == value {
            return Ok(false);
        }

        tracing::debug!(%entity, %state, "updating {} ({:?} -> {:?})", key, old, value);
        self.store.put(STATE_SCOPE, &key, value)?;
        Ok(true)
    }

    /// Recompute `entity` and store it as `state`, returning the computed hash.
    pub fn update(&mut self, entity: TrackedEntity, state: HashState) -> Result<String> {
        let computed = self.computer.hash(entity);
        self.set_if_changed(entity, state, &computed)?;
        Ok(computed)
    }

    /// Recompute `entity` and record it as observed.
    pub fn update_observed(&mut self, entity: TrackedEntity) -> Result<String> {
        self.update(entity, HashState::Observed)
    }

    /// Whether `entity` changed since it was last resolved.
    ///
    /// An entity with either view unset is never unresolved.
    pub fn is_unresolved(&self, entity: TrackedEntity) -> bool {
        let observed = self.get(entity, HashState::Observed);
        let resolved = self.get(entity, HashState::Resolved);
        !observed.is_empty() && !resolved.is_empty() && observed != resolved
    }
}
