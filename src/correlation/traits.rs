/*!
 * Correlation Strategy Trait
 *
 * Per-context nesting of composite monitors and attribute inheritance.
 * Implementations are called concurrently from every instrumented thread
 * without caller-side locking.
 */

use crate::core::types::EngineResult;
use crate::monitor::{AttributeHolder, AttributeMap, Monitor, MonitorRef};

/// Outcome of completing a composite monitor
#[derive(Debug)]
pub enum Completion {
    /// The monitor was popped
    ///
    /// `abandoned` holds the monitors that were still open above it,
    /// innermost first. Each must be finished with a full process dispatch.
    Completed { abandoned: Vec<MonitorRef> },
    /// The monitor was not open on the calling context
    NotFound,
}

impl Completion {
    pub fn is_found(&self) -> bool {
        matches!(self, Completion::Completed { .. })
    }
}

/// Per-context nesting and inheritance rules
pub trait CorrelationStrategy: Send + Sync {
    fn startup(&self) {}

    /// Drop all per-context state
    fn shutdown(&self) {}

    /// Push onto the calling context's stack
    ///
    /// Monitors without a level are skipped with a diagnostic.
    fn composite_monitor_started(&self, monitor: &MonitorRef);

    /// Pop `monitor` and everything opened above it
    ///
    /// Never fails: a monitor that is not open is reported as
    /// [`Completion::NotFound`] with a diagnostic.
    fn composite_monitor_completed(&self, monitor: &Monitor) -> Completion;

    /// Record `monitor` against the innermost open composite, before dispatch
    fn process_monitor_for_composite(&self, monitor: &MonitorRef);

    /// Most recently started open composite named `name`
    ///
    /// Fails with an invalid-argument error if `name` is empty.
    fn composite_monitor_named(&self, name: &str) -> EngineResult<Option<MonitorRef>>;

    /// Inheritable attributes of the open composites, innermost winning
    fn inheritable_attributes(&self) -> AttributeMap;

    /// Propagate `holder` under `key` to monitors created while `composite` is open
    fn set_inheritable(&self, composite: &Monitor, key: &str, holder: AttributeHolder);

    /// Discard the calling context's stack without dispatching anything
    ///
    /// Returns the number of discarded monitors.
    fn clear_current_thread(&self) -> usize;

    /// Number of open composites on the calling context
    fn stack_depth(&self) -> usize;
}
