/*!
 * Transaction Scope Tests
 */

use crate::support::running_engine;
use monitoring_engine::{keys, MonitoringLevel, Transaction};
use pretty_assertions::assert_eq;

#[test]
fn test_transaction_lifecycle_callbacks() {
    let (engine, log) = running_engine();

    let tx = Transaction::start(&engine, "checkout", MonitoringLevel::Info);
    assert_eq!(engine.stack_depth(), 1);
    tx.succeeded();
    tx.done();

    assert_eq!(engine.stack_depth(), 0);
    let callbacks: Vec<&str> = log.calls().iter().map(|(_, c, _)| *c).collect();
    assert_eq!(callbacks, vec!["created", "started", "process"]);
}

#[test]
fn test_transaction_records_timing_and_outcome() {
    let (engine, _log) = running_engine();

    let tx = Transaction::start(&engine, "checkout", MonitoringLevel::Info);
    let monitor = tx.monitor().clone();
    tx.failed_due_to("card declined");
    drop(tx);

    assert!(monitor.has_attribute(keys::START_TIME));
    assert!(monitor.has_attribute(keys::END_TIME));
    assert!(monitor.value(keys::LATENCY).and_then(|v| v.as_i64()).is_some());
    assert_eq!(monitor.value(keys::FAILED).and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        monitor.get_as_string(keys::FAILURE_REASON).as_deref(),
        Some("card declined")
    );

    let view = engine.make_attribute_holders_serializable(&monitor.snapshot());
    assert!(view.contains_key(keys::LATENCY));
}

#[test]
fn test_dropped_transaction_defaults_to_success() {
    let (engine, log) = running_engine();
    let monitor = {
        let tx = Transaction::start(&engine, "implicit", MonitoringLevel::Info);
        tx.monitor().clone()
    };

    assert_eq!(monitor.value(keys::FAILED).and_then(|v| v.as_bool()), Some(false));
    assert_eq!(log.seen("recorder", "process"), vec!["implicit".to_string()]);
}

#[test]
fn test_nested_transactions_inherit_and_link() {
    let (engine, log) = running_engine();

    let outer = Transaction::start(&engine, "request", MonitoringLevel::Info);
    outer.set_inheritable("requestId", "req-7");
    outer.set("local", true);

    let inner = Transaction::start(&engine, "db.query", MonitoringLevel::Debug);
    assert_eq!(
        inner.monitor().get_as_string("requestId").as_deref(),
        Some("req-7")
    );
    assert!(!inner.monitor().has_attribute("local"));
    let inner_id = inner.monitor().id();
    inner.done();

    let request = outer.monitor().clone();
    outer.done();

    assert_eq!(
        log.seen("recorder", "process"),
        vec!["db.query".to_string(), "request".to_string()]
    );
    let children = request.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id(), inner_id);
}

#[test]
fn test_outer_done_finishes_forgotten_inner() {
    let (engine, log) = running_engine();

    let outer = Transaction::start(&engine, "request", MonitoringLevel::Info);
    let inner = Transaction::start(&engine, "leaked", MonitoringLevel::Info);
    outer.done();
    assert_eq!(engine.stack_depth(), 0);
    assert_eq!(
        log.seen("recorder", "process"),
        vec!["leaked".to_string(), "request".to_string()]
    );

    // completing the already finished inner scope is tolerated
    inner.done();
    assert_eq!(log.seen("recorder", "process").len(), 3);
}
