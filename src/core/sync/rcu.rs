/*!
 * Read-Copy-Update (RCU) Cell
 * Zero-contention reads for the engine's read-mostly shared state
 */

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

/// RCU-protected value with lock-free reads and serialized writers
///
/// Global attributes and level override tables are written by rare
/// administrative calls and read on every monitor lifecycle call from every
/// application thread. Readers take an atomic snapshot; writers clone,
/// modify and swap under a writer mutex so read-modify-write sequences
/// never lose updates.
///
/// # Example
///
/// ```ignore
/// let table = RcuCell::new(HashMap::new());
///
/// // Read (lock-free snapshot)
/// let level = table.load().get("svc").copied();
///
/// // Write (clone-modify-swap)
/// table.modify(|map| map.insert("svc".to_string(), level));
/// ```
pub struct RcuCell<T> {
    inner: ArcSwap<T>,
    writer: Mutex<()>,
}

impl<T> RcuCell<T> {
    /// Create new RCU cell
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            inner: ArcSwap::from_pointee(value),
            writer: Mutex::new(()),
        }
    }

    /// Load current snapshot (lock-free)
    #[inline(always)]
    pub fn load(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Replace value entirely
    #[inline]
    pub fn store(&self, new_value: T) {
        let _writer = self.writer.lock();
        self.inner.store(Arc::new(new_value));
    }
}

impl<T: Clone> RcuCell<T> {
    /// Clone the current value, apply `f` and publish the result
    pub fn modify<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let _writer = self.writer.lock();
        let mut next = T::clone(&self.inner.load());
        let result = f(&mut next);
        self.inner.store(Arc::new(next));
        result
    }

    /// Like [`modify`](Self::modify), but publishes only when `f` succeeds
    pub fn try_modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let _writer = self.writer.lock();
        let mut next = T::clone(&self.inner.load());
        let result = f(&mut next)?;
        self.inner.store(Arc::new(next));
        Ok(result)
    }
}

impl<T: Default> Default for RcuCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RcuCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RcuCell").field(&self.load()).finish()
    }
}
