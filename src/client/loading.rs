//! Loading State
//!
//! Loading indicator shared between a client and its observers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Tracks whether any query is currently streaming
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    /// Mark a query as started; the returned guard marks it finished on drop
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

/// Resets its [`LoadingFlag`] when dropped, on success and error paths alike
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_resets_flag() {
        let flag = LoadingFlag::new();
        assert!(!flag.is_loading());

        let guard = flag.begin();
        assert!(flag.is_loading());
        drop(guard);
        assert!(!flag.is_loading());
    }

    #[test]
    fn test_overlapping_queries() {
        let flag = LoadingFlag::new();
        let first = flag.begin();
        let second = flag.clone().begin();

        drop(first);
        assert!(flag.is_loading());
        drop(second);
        assert!(!flag.is_loading());
    }

    #[test]
    fn test_reset_on_early_return() {
        fn failing(flag: &LoadingFlag) -> Result<(), &'static str> {
            let _guard = flag.begin();
            Err("read failed")
        }

        let flag = LoadingFlag::new();
        assert!(failing(&flag).is_err());
        assert!(!flag.is_loading());
    }
}
