/*!
 * Simple Processor Factory
 * Fixed processor list with optional level filtering
 */

use super::traits::{ProcessorFactory, ProcessorRef};
use crate::monitor::Monitor;
use crate::overrides::LevelOverrides;
use std::sync::Arc;
use tracing::info;

/// Hands every monitor the same ordered processor list
///
/// With a level filter attached, a processor only receives monitors whose
/// effective level its own effective level includes. Monitors without any
/// level go to every processor.
pub struct SimpleProcessorFactory {
    processors: Vec<ProcessorRef>,
    overrides: Option<Arc<LevelOverrides>>,
}

impl SimpleProcessorFactory {
    pub fn new(processors: Vec<ProcessorRef>) -> Self {
        Self {
            processors,
            overrides: None,
        }
    }

    /// Filter processors using `overrides` and the declared levels
    pub fn with_level_filter(mut self, overrides: Arc<LevelOverrides>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn processors(&self) -> &[ProcessorRef] {
        &self.processors
    }
}

impl ProcessorFactory for SimpleProcessorFactory {
    fn startup(&self) {
        info!(processors = self.processors.len(), "processor factory started");
    }

    fn shutdown(&self) {
        info!("processor factory shut down");
    }

    fn processors_for_monitor(&self, monitor: &Monitor) -> anyhow::Result<Vec<ProcessorRef>> {
        let Some(overrides) = &self.overrides else {
            return Ok(self.processors.clone());
        };

        let Some(monitor_level) = overrides.level_for_monitor(monitor).or(monitor.level()) else {
            return Ok(self.processors.clone());
        };

        Ok(self
            .processors
            .iter()
            .filter(|p| {
                overrides
                    .processor_level(p.name())
                    .unwrap_or_else(|| p.level())
                    .includes(monitor_level)
            })
            .cloned()
            .collect())
    }
}
