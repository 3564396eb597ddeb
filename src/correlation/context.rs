/*!
 * Execution Context Identity
 *
 * Nesting stacks are partitioned by the calling execution context. Each
 * native thread is lazily assigned a process-unique id the first time it
 * touches the engine; ids are never reused, so a stack left behind by an
 * exited thread can never be observed by a new one.
 *
 * Per-context state held outside the thread is released when the thread
 * exits: holders register a weak release hook with the thread's context
 * slot, and the slot's destructor runs every hook still alive.
 */

use crate::core::types::ContextId;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CONTEXT: ContextSlot = ContextSlot::new();
}

/// Per-context state that must be dropped when its context ends
pub(crate) trait ContextRelease: Send + Sync {
    fn release_context(&self, key: ContextKey);
}

struct ContextSlot {
    key: ContextKey,
    hooks: RefCell<Vec<Weak<dyn ContextRelease>>>,
}

impl ContextSlot {
    fn new() -> Self {
        Self {
            key: ContextKey::fresh(),
            hooks: RefCell::new(Vec::new()),
        }
    }
}

impl Drop for ContextSlot {
    fn drop(&mut self) {
        for hook in self.hooks.get_mut().drain(..) {
            if let Some(holder) = hook.upgrade() {
                holder.release_context(self.key);
            }
        }
    }
}

/// Identity of the calling execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(ContextId);

impl ContextKey {
    fn fresh() -> Self {
        ContextKey(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Key of the calling thread
    ///
    /// While the thread's locals are being torn down, each call yields a new
    /// key that is never released automatically.
    #[inline]
    pub fn current() -> Self {
        CONTEXT
            .try_with(|slot| slot.key)
            .unwrap_or_else(|_| Self::fresh())
    }

    #[inline]
    pub fn id(self) -> ContextId {
        self.0
    }

    /// Lower-case hex form, as recorded in the thread id attribute
    pub fn to_hex(self) -> String {
        format!("{:x}", self.0)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Run `hook` when the calling thread exits
///
/// Registering the same holder twice is a no-op. Hooks whose holder has
/// been dropped are pruned.
pub(crate) fn release_on_exit(hook: Weak<dyn ContextRelease>) {
    let _ = CONTEXT.try_with(|slot| {
        let mut hooks = slot.hooks.borrow_mut();
        hooks.retain(|existing| existing.strong_count() > 0);
        if !hooks.iter().any(|existing| Weak::ptr_eq(existing, &hook)) {
            hooks.push(hook);
        }
    });
}
