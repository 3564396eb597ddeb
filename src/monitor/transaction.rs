/*!
 * Transaction Scope
 * RAII composite monitor covering a unit of work
 */

use super::entity::{Monitor, MonitorRef};
use super::keys;
use super::level::MonitoringLevel;
use super::value::AttributeValue;
use super::AttributeHolder;
use crate::core::types::Millis;
use crate::engine::MonitoringEngine;
use std::fmt;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Composite monitor scope
///
/// Nests on the calling context's stack from `start` until `done`, or until
/// dropped. Monitors created in between inherit its inheritable attributes
/// and are recorded as its children.
///
/// # Example
///
/// ```ignore
/// let tx = Transaction::start(&engine, "checkout.submit", MonitoringLevel::Info);
/// tx.set_inheritable("orderId", 42i64);
/// match submit() {
///     Ok(_) => tx.succeeded(),
///     Err(err) => tx.failed_due_to(&err),
/// }
/// tx.done();
/// ```
pub struct Transaction {
    engine: Arc<MonitoringEngine>,
    monitor: MonitorRef,
    started: Instant,
    finished: bool,
}

impl Transaction {
    pub fn start(engine: &Arc<MonitoringEngine>, name: &str, level: MonitoringLevel) -> Self {
        let monitor = Monitor::composite(name, level);
        engine.init_monitor(&monitor, true);
        engine.monitor_created(&monitor);

        engine.composite_monitor_started(&monitor);
        monitor
            .attributes_mut()
            .set(keys::START_TIME, SystemTime::now())
            .serializable();
        engine.monitor_started(&monitor);

        Self {
            engine: Arc::clone(engine),
            monitor,
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn monitor(&self) -> &MonitorRef {
        &self.monitor
    }

    pub fn set(&self, key: &str, value: impl Into<AttributeValue>) -> AttributeHolder {
        self.monitor.set(key, value)
    }

    /// Set an attribute that monitors created inside this scope inherit
    pub fn set_inheritable(&self, key: &str, value: impl Into<AttributeValue>) -> AttributeHolder {
        self.engine.set_inheritable_attribute(&self.monitor, key, value)
    }

    pub fn failed_due_to(&self, reason: impl fmt::Display) {
        let mut attributes = self.monitor.attributes_mut();
        attributes.set(keys::FAILED, true).serializable();
        attributes
            .set(keys::FAILURE_REASON, reason.to_string())
            .serializable();
    }

    pub fn succeeded(&self) {
        self.monitor
            .attributes_mut()
            .set(keys::FAILED, false)
            .serializable();
    }

    /// Elapsed time since `start`
    pub fn elapsed(&self) -> Millis {
        self.started.elapsed().as_millis() as Millis
    }

    /// Record timing, complete the composite and process it
    pub fn done(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        let latency = i64::try_from(self.elapsed()).unwrap_or(i64::MAX);
        {
            let mut attributes = self.monitor.attributes_mut();
            attributes
                .set(keys::END_TIME, SystemTime::now())
                .serializable();
            attributes.set(keys::LATENCY, latency).serializable();
            if !attributes.has_attribute(keys::FAILED) {
                attributes.set(keys::FAILED, false).serializable();
            }
        }

        self.engine.finish_composite(&self.monitor);
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        self.finish();
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("monitor", &self.monitor)
            .field("finished", &self.finished)
            .finish()
    }
}
