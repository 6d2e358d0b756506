use once_cell::sync::OnceCell;

use crate::error::Result;

/// A value computed on first access and then held.
///
/// Concurrent first accessors block until the single computation finishes
/// and all of them see the same value. A failed computation stores nothing,
/// so the next access runs it again.
#[derive(Debug)]
pub struct Deferred<T> {
    cell: OnceCell<T>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deferred<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.cell.get_or_try_init(init)
    }

    /// The value, if an earlier access computed it
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SnapshotError, SourceError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_computes_once() {
        let calls = AtomicUsize::new(0);
        let deferred = Deferred::new();

        for _ in 0..3 {
            let value = deferred
                .get_or_try_init(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .unwrap();
            assert_eq!(*value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let deferred: Deferred<u32> = Deferred::new();
        let err = deferred
            .get_or_try_init(|| Err(SnapshotError::unavailable("value", SourceError::Unsupported)))
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(!deferred.is_resolved());

        assert_eq!(*deferred.get_or_try_init(|| Ok(3)).unwrap(), 3);
        assert_eq!(deferred.get(), Some(&3));
    }

    #[test]
    fn test_concurrent_first_access_computes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let deferred = Arc::new(Deferred::new());
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let calls = Arc::clone(&calls);
                let deferred = Arc::clone(&deferred);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    *deferred
                        .get_or_try_init(|| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok(String::from("ready"))
                        })
                        .unwrap()
                        == "ready"
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
