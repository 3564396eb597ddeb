/*!
 * Stack Correlation Strategy
 * Default strategy: one nesting stack per execution context
 *
 * Stacks live in a sharded concurrent map keyed by context, so threads never
 * contend on each other's stack and the engine can drop every stack on
 * shutdown. No stack lock is ever held while monitors are dispatched.
 *
 * A thread that exits with composites still open releases its stack, and the
 * markings of those composites, from its context destructor.
 */

use super::context::{self, ContextKey, ContextRelease};
use super::traits::{Completion, CorrelationStrategy};
use crate::core::errors::EngineError;
use crate::core::limits::INITIAL_STACK_CAPACITY;
use crate::core::types::{EngineResult, MonitorId};
use crate::core::{ShardManager, WorkloadProfile};
use crate::monitor::{AttributeHolder, AttributeMap, Monitor, MonitorRef};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Per-context stacks of open composite monitors
pub struct StackCorrelationStrategy {
    state: Arc<ContextStacks>,
}

/// Tables shared with the thread-exit hooks
struct ContextStacks {
    stacks: DashMap<ContextKey, Vec<MonitorRef>, RandomState>,
    /// Inheritable markings of open composites, keyed by monitor
    inheritables: DashMap<MonitorId, AttributeMap, RandomState>,
}

impl ContextStacks {
    fn forget(&self, monitor: &Monitor) {
        self.inheritables.remove(&monitor.id());
    }

    fn remove_if_empty(&self, key: &ContextKey) {
        self.stacks.remove_if(key, |_, stack| stack.is_empty());
    }

    /// Drop the stack of `key` and the markings of every monitor on it
    fn discard(&self, key: &ContextKey) -> usize {
        match self.stacks.remove(key) {
            Some((_, stack)) => {
                for monitor in &stack {
                    self.forget(monitor);
                }
                stack.len()
            }
            None => 0,
        }
    }
}

impl ContextRelease for ContextStacks {
    fn release_context(&self, key: ContextKey) {
        let discarded = self.discard(&key);
        if discarded > 0 {
            debug!(context = key.id(), discarded, "thread exited with open composite monitors");
        }
    }
}

impl StackCorrelationStrategy {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ContextStacks {
                stacks: DashMap::with_capacity_and_hasher_and_shard_amount(
                    0,
                    RandomState::new(),
                    ShardManager::shards(WorkloadProfile::HighContention),
                ),
                inheritables: DashMap::with_capacity_and_hasher_and_shard_amount(
                    0,
                    RandomState::new(),
                    ShardManager::shards(WorkloadProfile::MediumContention),
                ),
            }),
        }
    }

    /// Number of contexts currently holding a stack
    pub fn tracked_contexts(&self) -> usize {
        self.state.stacks.len()
    }

    /// Number of open composites carrying inheritable markings
    pub fn marked_composites(&self) -> usize {
        self.state.inheritables.len()
    }
}

impl Default for StackCorrelationStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationStrategy for StackCorrelationStrategy {
    fn startup(&self) {
        info!("Stack correlation strategy started");
    }

    fn shutdown(&self) {
        let contexts = self.state.stacks.len();
        self.state.stacks.clear();
        self.state.inheritables.clear();
        info!(contexts, "Stack correlation strategy shut down, all stacks dropped");
    }

    fn composite_monitor_started(&self, monitor: &MonitorRef) {
        if monitor.level().is_none() {
            debug!(monitor = %monitor, "skipping composite monitor, it has no defined level");
            return;
        }

        match self.state.stacks.entry(ContextKey::current()) {
            Entry::Occupied(mut stack) => stack.get_mut().push(Arc::clone(monitor)),
            Entry::Vacant(slot) => {
                let mut stack = Vec::with_capacity(INITIAL_STACK_CAPACITY);
                stack.push(Arc::clone(monitor));
                slot.insert(stack);

                let hook: Weak<dyn ContextRelease> = Arc::<ContextStacks>::downgrade(&self.state);
                context::release_on_exit(hook);
            }
        }
    }

    fn composite_monitor_completed(&self, monitor: &Monitor) -> Completion {
        let key = ContextKey::current();

        let (abandoned, now_empty) = {
            let Some(mut stack) = self.state.stacks.get_mut(&key) else {
                warn!(monitor = %monitor, "completed composite monitor was never started on this thread");
                return Completion::NotFound;
            };

            let Some(position) = stack.iter().rposition(|open| open.id() == monitor.id()) else {
                warn!(monitor = %monitor, depth = stack.len(), "completed composite monitor is not on this thread's stack");
                return Completion::NotFound;
            };

            // Innermost first
            let abandoned: Vec<MonitorRef> = stack.drain(position + 1..).rev().collect();
            stack.pop();
            (abandoned, stack.is_empty())
        };

        if now_empty {
            self.state.remove_if_empty(&key);
        }

        for (i, missed) in abandoned.iter().enumerate() {
            let parent = abandoned.get(i + 1).map(|p| p.as_ref()).unwrap_or(monitor);
            parent.add_child(Arc::clone(missed));
            self.state.forget(missed);
            warn!(
                monitor = %missed,
                completed = %monitor,
                "composite monitor finished out of order, completing it implicitly"
            );
        }
        self.state.forget(monitor);

        if !abandoned.is_empty() {
            warn!(
                monitor = %monitor,
                unfinished = abandoned.len(),
                "composite monitor completed out of order with unfinished nested monitors"
            );
        }

        Completion::Completed { abandoned }
    }

    fn process_monitor_for_composite(&self, monitor: &MonitorRef) {
        let Some(stack) = self.state.stacks.get(&ContextKey::current()) else {
            return;
        };

        match stack.last() {
            Some(parent) if parent.id() != monitor.id() => parent.add_child(Arc::clone(monitor)),
            Some(_) => {
                debug!(monitor = %monitor, "composite monitor processed while still open");
            }
            None => {}
        }
    }

    fn composite_monitor_named(&self, name: &str) -> EngineResult<Option<MonitorRef>> {
        if name.is_empty() {
            return Err(EngineError::invalid_argument("composite monitor name must not be empty"));
        }

        Ok(self.state.stacks.get(&ContextKey::current()).and_then(|stack| {
            stack
                .iter()
                .rev()
                .find(|open| open.name() == name)
                .cloned()
        }))
    }

    fn inheritable_attributes(&self) -> AttributeMap {
        let mut merged = AttributeMap::new();

        // Outermost first
        let open: Vec<MonitorId> = match self.state.stacks.get(&ContextKey::current()) {
            Some(stack) => stack.iter().map(|m| m.id()).collect(),
            None => return merged,
        };

        for id in open {
            if let Some(marked) = self.state.inheritables.get(&id) {
                for (key, holder) in marked.iter() {
                    merged.put(key.clone(), holder.clone());
                }
            }
        }

        merged
    }

    fn set_inheritable(&self, composite: &Monitor, key: &str, holder: AttributeHolder) {
        let Some(stack) = self.state.stacks.get(&ContextKey::current()) else {
            debug!(monitor = %composite, key, "ignoring inheritable attribute, no composite is open");
            return;
        };

        if !stack.iter().any(|m| m.id() == composite.id()) {
            debug!(monitor = %composite, key, "ignoring inheritable attribute for a composite that is not open");
            return;
        }

        // Marked under the stack guard so a concurrent shutdown cannot
        // clear the stack between the check and the insert
        self.state
            .inheritables
            .entry(composite.id())
            .or_insert_with(AttributeMap::new)
            .put(key.to_string(), holder);
    }

    fn clear_current_thread(&self) -> usize {
        let cleared = self.state.discard(&ContextKey::current());
        if cleared > 0 {
            debug!(cleared, "cleared open composite monitors for current thread");
        }
        cleared
    }

    fn stack_depth(&self) -> usize {
        self.state.stacks
            .get(&ContextKey::current())
            .map(|stack| stack.len())
            .unwrap_or(0)
    }
}
