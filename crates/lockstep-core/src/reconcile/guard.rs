//! Non-blocking re-entrancy guard

use std::cell::Cell;
use std::rc::Rc;

/// Drops calls that re-enter while a guarded scope is open.
///
/// Everything runs on one control thread, so this is a plain flag rather
/// than a lock: a nested [`enter`](Self::enter) returns `None` instead of
/// waiting.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    active: Rc<Cell<bool>>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope, or `None` if one is already open.
    pub fn enter(&self) -> Option<GuardScope> {
        if self.active.replace(true) {
            return None;
        }
        Some(GuardScope {
            active: Rc::clone(&self.active),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// An open guard scope. The flag clears when this is dropped.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct GuardScope {
    active: Rc<Cell<bool>>,
}

impl Drop for GuardScope {
    fn drop(&mut self) {
        self.active.set(false);
    }
}
