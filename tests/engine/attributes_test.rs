/*!
 * Attribute Tests
 * Global precedence, locking and the serializable view
 */

use crate::support::running_engine;
use monitoring_engine::{keys, AttributeHolder, AttributeMap, AttributeValue, Monitor, MonitoringLevel};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_explicit_set_overrides_unlocked_global() {
    let (engine, _log) = running_engine();
    engine.set_global("env", "prod");

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.init_monitor(&monitor, true);
    assert_eq!(monitor.get_as_string("env").as_deref(), Some("prod"));

    monitor.set("env", "staging");
    assert_eq!(monitor.get_as_string("env").as_deref(), Some("staging"));
}

#[test]
fn test_locked_global_rejects_explicit_set() {
    let (engine, _log) = running_engine();
    engine.set_global("env", "prod");
    assert!(engine.lock_global_attribute("env"));

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.init_monitor(&monitor, true);
    let holder = monitor.set("env", "staging");

    assert_eq!(holder.value(), &AttributeValue::from("prod"));
    assert!(holder.is_locked());
    assert_eq!(monitor.get_as_string("env").as_deref(), Some("prod"));
}

#[test]
fn test_globals_never_overwrite_existing_keys() {
    let (engine, _log) = running_engine();
    engine.set_global_attributes([("region", "eu"), ("tier", "gold")]);
    engine.set_global_attribute(keys::NAME, "spoofed");

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    monitor.set("region", "local");
    engine.init_monitor(&monitor, false);

    assert_eq!(monitor.get_as_string("region").as_deref(), Some("local"));
    assert_eq!(monitor.get_as_string("tier").as_deref(), Some("gold"));
    assert_eq!(monitor.get_as_string(keys::NAME).as_deref(), Some("svc.op"));
}

#[test]
fn test_global_flags_carried_into_monitor() {
    let (engine, _log) = running_engine();
    engine.set_global("env", "prod");
    engine.set_global_attribute("build", 42);

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.init_monitor(&monitor, false);

    assert!(monitor.get("env").unwrap().is_serializable());
    assert!(!monitor.get("build").unwrap().is_serializable());
}

#[test]
fn test_serializable_view_decomposes_marked_holders() {
    let (engine, _log) = running_engine();
    engine.set_global("env", "prod");
    engine.set_global_attribute("build", 42);

    let monitor = Monitor::event("svc.op", MonitoringLevel::Info);
    engine.init_monitor(&monitor, false);
    monitor.attributes_mut().set("bytes", 512i64).serializable();

    let view = engine.make_attribute_holders_serializable(&monitor.snapshot());

    assert_eq!(view.get("env"), Some(&json!("prod")));
    assert_eq!(view.get("bytes"), Some(&json!(512)));
    assert_eq!(view.get(keys::NAME), Some(&json!("svc.op")));
    assert!(view.contains_key(keys::CREATED_AT));
    assert!(!view.contains_key("build"));
}

proptest! {
    #[test]
    fn prop_locked_holder_never_changes(original in any::<i64>(), attempts in prop::collection::vec(any::<i64>(), 1..8)) {
        let mut map = AttributeMap::new();
        map.set("counter", original).lock();
        let expected: AttributeHolder = map.get("counter").cloned().unwrap();

        for attempt in attempts {
            let returned = map.set("counter", attempt).clone();
            prop_assert_eq!(&returned, &expected);
        }
        prop_assert_eq!(map.value("counter"), Some(&AttributeValue::Long(original)));
    }
}
