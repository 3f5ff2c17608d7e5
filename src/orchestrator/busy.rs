//! Busy indicator
//!
//! Shown while any action is in flight. A [`BusyGuard`] clears its share on
//! drop, so every exit path of an action restores the indicator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BusyIndicator {
    active: Arc<AtomicUsize>,
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one action as running until the guard is dropped
    pub fn begin(&self) -> BusyGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        BusyGuard {
            active: Arc::clone(&self.active),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clears_on_drop() {
        let busy = BusyIndicator::new();
        assert!(!busy.is_busy());

        let first = busy.begin();
        let second = busy.clone().begin();
        assert!(busy.is_busy());

        drop(first);
        assert!(busy.is_busy());
        drop(second);
        assert!(!busy.is_busy());
    }
}
