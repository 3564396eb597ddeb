/*!
 * Shared Test Fixtures
 */

#![allow(dead_code)]

use anyhow::bail;
use monitoring_engine::{
    JsonDecomposer, MonitorProcessor, MonitorRef, MonitoringEngine, MonitoringLevel,
    ProcessorRef, SimpleProcessorFactory,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// (processor, callback, monitor name)
pub type Call = (String, &'static str, String);

/// Shared call log across processors
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Monitor names seen by `processor` for `callback`, in order
    pub fn seen(&self, processor: &str, callback: &str) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|(p, c, _)| p == processor && *c == callback)
            .map(|(_, _, m)| m.clone())
            .collect()
    }

    fn push(&self, processor: &str, callback: &'static str, monitor: &MonitorRef) {
        self.0
            .lock()
            .push((processor.to_string(), callback, monitor.name().to_string()));
    }
}

/// How a processor misbehaves
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    ErrorOnStarted,
    PanicOnStarted,
    ErrorOnProcess,
}

pub struct RecordingProcessor {
    name: String,
    level: MonitoringLevel,
    fault: Fault,
    log: CallLog,
}

impl RecordingProcessor {
    pub fn new(name: &str, log: &CallLog) -> ProcessorRef {
        Self::with_fault(name, log, Fault::None)
    }

    pub fn with_fault(name: &str, log: &CallLog, fault: Fault) -> ProcessorRef {
        Arc::new(Self {
            name: name.to_string(),
            level: MonitoringLevel::Debug,
            fault,
            log: log.clone(),
        })
    }

    pub fn with_level(name: &str, log: &CallLog, level: MonitoringLevel) -> ProcessorRef {
        Arc::new(Self {
            name: name.to_string(),
            level,
            fault: Fault::None,
            log: log.clone(),
        })
    }
}

impl MonitorProcessor for RecordingProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> MonitoringLevel {
        self.level
    }

    fn monitor_created(&self, monitor: &MonitorRef) -> anyhow::Result<()> {
        self.log.push(&self.name, "created", monitor);
        Ok(())
    }

    fn monitor_started(&self, monitor: &MonitorRef) -> anyhow::Result<()> {
        self.log.push(&self.name, "started", monitor);
        match self.fault {
            Fault::ErrorOnStarted => bail!("sink unavailable"),
            Fault::PanicOnStarted => panic!("processor bug"),
            _ => Ok(()),
        }
    }

    fn process(&self, monitor: &MonitorRef) -> anyhow::Result<()> {
        self.log.push(&self.name, "process", monitor);
        if self.fault == Fault::ErrorOnProcess {
            bail!("write failed");
        }
        Ok(())
    }
}

/// Unstarted engine dispatching to `processors`
pub fn engine_with(processors: Vec<ProcessorRef>) -> Arc<MonitoringEngine> {
    MonitoringEngine::builder()
        .with_processor_factory(Arc::new(SimpleProcessorFactory::new(processors)))
        .with_decomposer(Arc::new(JsonDecomposer))
        .build()
}

/// Running engine with a single recording processor named "recorder"
pub fn running_engine() -> (Arc<MonitoringEngine>, CallLog) {
    let log = CallLog::default();
    let engine = engine_with(vec![RecordingProcessor::new("recorder", &log)]);
    engine.startup().expect("engine should start");
    (engine, log)
}
