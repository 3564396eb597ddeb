/*!
 * Processor Traits
 *
 * Collaborator contracts consumed by the engine. Every callback may fail or
 * panic; the engine isolates each call so the instrumented application never
 * observes it.
 */

use crate::monitor::{AttributeHolder, Monitor, MonitorRef, MonitoringLevel};
use std::sync::Arc;

/// Shared processor handle
pub type ProcessorRef = Arc<dyn MonitorProcessor>;

/// Observer invoked at each monitor lifecycle point
///
/// Callbacks run synchronously on the instrumented thread; their cost is
/// added latency on the instrumented path.
pub trait MonitorProcessor: Send + Sync {
    /// Name used for processor level overrides
    fn name(&self) -> &str;

    /// Most verbose level this processor accepts when level filtering is on
    fn level(&self) -> MonitoringLevel {
        MonitoringLevel::Debug
    }

    fn monitor_created(&self, _monitor: &MonitorRef) -> anyhow::Result<()> {
        Ok(())
    }

    fn monitor_started(&self, _monitor: &MonitorRef) -> anyhow::Result<()> {
        Ok(())
    }

    /// The monitor is finished and ready to be recorded
    fn process(&self, monitor: &MonitorRef) -> anyhow::Result<()>;
}

/// Source of the ordered processor list for each monitor
pub trait ProcessorFactory: Send + Sync {
    fn startup(&self) {}

    fn shutdown(&self) {}

    fn processors_for_monitor(&self, monitor: &Monitor) -> anyhow::Result<Vec<ProcessorRef>>;
}

/// Converts serializable attribute holders to a wire/storage form
pub trait Decomposer: Send + Sync {
    fn decompose(&self, holder: &AttributeHolder) -> serde_json::Value;
}
