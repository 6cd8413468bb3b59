//! Single-slot pool for the generic window.
//!
//! At most one recyclable window exists. `acquire` hands it out and marks it
//! busy; `release` gives it back. The handle's `is_available` flag mirrors
//! the slot's idle state.

use super::types::WindowKey;

#[derive(Debug, Default)]
pub struct GenericPool {
    slot: Option<WindowKey>,
    idle: bool,
}

impl GenericPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created generic window as the pooled one (idle).
    /// Returns false if the slot is already taken.
    pub fn install(&mut self, key: WindowKey) -> bool {
        if self.slot.is_some() {
            return false;
        }
        self.slot = Some(key);
        self.idle = true;
        true
    }

    /// Take the pooled window if it is idle.
    pub fn acquire(&mut self) -> Option<WindowKey> {
        if !self.idle {
            return None;
        }
        self.idle = false;
        self.slot
    }

    /// Return `key` to the pool. Ignored unless `key` is the pooled window.
    pub fn release(&mut self, key: WindowKey) -> bool {
        if self.slot != Some(key) {
            return false;
        }
        self.idle = true;
        true
    }

    /// Forget `key` (its native window is gone).
    pub fn evict(&mut self, key: WindowKey) {
        if self.slot == Some(key) {
            self.slot = None;
            self.idle = false;
        }
    }

    pub fn pooled(&self) -> Option<WindowKey> {
        self.slot
    }
}
