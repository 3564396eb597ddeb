/*!
 * Dispatch and Fault Isolation Tests
 */

use crate::support::{engine_with, running_engine, CallLog, Fault, RecordingProcessor};
use monitoring_engine::{
    JsonDecomposer, Monitor, MonitorProcessor, MonitorRef, MonitoringEngine, MonitoringLevel,
    ProcessorFactory, ProcessorRef,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_callbacks_reach_processors_in_order() {
    let log = CallLog::default();
    let engine = engine_with(vec![
        RecordingProcessor::new("first", &log),
        RecordingProcessor::new("second", &log),
    ]);
    engine.startup().unwrap();

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.monitor_created(&monitor);
    engine.monitor_started(&monitor);
    engine.process(&monitor);

    let calls: Vec<(String, &str)> = log
        .calls()
        .into_iter()
        .map(|(processor, callback, _)| (processor, callback))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("first".to_string(), "created"),
            ("second".to_string(), "created"),
            ("first".to_string(), "started"),
            ("second".to_string(), "started"),
            ("first".to_string(), "process"),
            ("second".to_string(), "process"),
        ]
    );
}

#[test]
fn test_failing_started_callback_is_isolated() {
    let log = CallLog::default();
    let engine = engine_with(vec![
        RecordingProcessor::with_fault("flaky", &log, Fault::ErrorOnStarted),
        RecordingProcessor::new("steady", &log),
    ]);
    engine.startup().unwrap();

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.monitor_started(&monitor);
    engine.process(&monitor);

    assert_eq!(log.seen("steady", "started"), vec!["svc.op".to_string()]);
    assert_eq!(log.seen("flaky", "process"), vec!["svc.op".to_string()]);
    assert_eq!(log.seen("steady", "process"), vec!["svc.op".to_string()]);
}

#[test]
fn test_panicking_processor_is_isolated() {
    let log = CallLog::default();
    let engine = engine_with(vec![
        RecordingProcessor::with_fault("buggy", &log, Fault::PanicOnStarted),
        RecordingProcessor::new("steady", &log),
    ]);
    engine.startup().unwrap();

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.monitor_started(&monitor);
    engine.process(&monitor);

    assert_eq!(log.seen("steady", "started").len(), 1);
    assert_eq!(log.seen("buggy", "process").len(), 1);
}

#[test]
fn test_failing_process_does_not_stop_later_processors() {
    let log = CallLog::default();
    let engine = engine_with(vec![
        RecordingProcessor::with_fault("broken", &log, Fault::ErrorOnProcess),
        RecordingProcessor::new("steady", &log),
    ]);
    engine.startup().unwrap();

    engine.process(&Monitor::event("svc.op", MonitoringLevel::Info));
    assert_eq!(log.seen("steady", "process").len(), 1);
}

struct BrokenFactory;

impl ProcessorFactory for BrokenFactory {
    fn processors_for_monitor(&self, monitor: &Monitor) -> anyhow::Result<Vec<ProcessorRef>> {
        if monitor.name() == "explode" {
            panic!("factory bug");
        }
        anyhow::bail!("no route for {}", monitor.name())
    }
}

#[test]
fn test_factory_failures_are_contained() {
    let engine = MonitoringEngine::builder()
        .with_processor_factory(Arc::new(BrokenFactory))
        .with_decomposer(Arc::new(JsonDecomposer))
        .build();
    engine.startup().unwrap();

    engine.process(&Monitor::event("svc.op", MonitoringLevel::Info));
    engine.process(&Monitor::event("explode", MonitoringLevel::Info));
    assert!(engine.is_enabled());
}

struct Stamper;

impl MonitorProcessor for Stamper {
    fn name(&self) -> &str {
        "stamper"
    }

    fn process(&self, monitor: &MonitorRef) -> anyhow::Result<()> {
        monitor.set("stamped", true);
        Ok(())
    }
}

#[test]
fn test_processors_may_mutate_monitor() {
    let stamper: ProcessorRef = Arc::new(Stamper);
    let engine = engine_with(vec![stamper]);
    engine.startup().unwrap();

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.process(&monitor);
    assert_eq!(
        monitor.value("stamped").and_then(|v| v.as_bool()),
        Some(true)
    );
}

#[test]
fn test_event_fires_created_then_process() {
    let (engine, log) = running_engine();

    let monitor = engine.event("cache.miss", MonitoringLevel::Debug, [("key", "user:1")]);

    assert_eq!(log.seen("recorder", "created"), vec!["cache.miss".to_string()]);
    assert_eq!(log.seen("recorder", "process"), vec!["cache.miss".to_string()]);
    assert_eq!(monitor.get_as_string("key").as_deref(), Some("user:1"));
    assert!(monitor.has_attribute(monitoring_engine::keys::CREATED_AT));
}
