//! In-progress flags for the two long-running operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A boolean "operation in progress" flag.
///
/// The flag is set by [`BusyFlag::try_acquire`] and cleared when the returned
/// guard drops, so every exit path of the guarded operation releases it.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag unless it is already set.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.inner
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                flag: self.inner.clone(),
            })
    }

    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

/// Clears its [`BusyFlag`] on drop.
#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_set());
        assert!(flag.try_acquire().is_none());
    }

    #[test]
    fn test_drop_releases_flag() {
        let flag = BusyFlag::new();
        {
            let _guard = flag.try_acquire().unwrap();
            assert!(flag.is_set());
        }
        assert!(!flag.is_set());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_release_on_early_return() {
        fn guarded(flag: &BusyFlag, fail: bool) -> Result<(), &'static str> {
            let _guard = flag.try_acquire().ok_or("busy")?;
            if fail {
                return Err("failed");
            }
            Ok(())
        }

        let flag = BusyFlag::new();
        assert!(guarded(&flag, true).is_err());
        assert!(!flag.is_set());
        assert!(guarded(&flag, false).is_ok());
        assert!(!flag.is_set());
    }
}
