/*!
 * Concurrency Tests
 * Per-thread stack isolation and lock-free reads under administrative writes
 */

use crate::support::running_engine;
use monitoring_engine::{Monitor, MonitoringLevel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const ITERATIONS: usize = 200;

#[test]
fn test_stacks_are_isolated_per_thread() {
    let (engine, log) = running_engine();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITERATIONS {
                    let outer = Monitor::composite(format!("t{}.outer", t), MonitoringLevel::Info);
                    let inner = Monitor::composite(format!("t{}.inner", t), MonitoringLevel::Info);
                    engine.composite_monitor_started(&outer);
                    engine.set_inheritable_attribute(&outer, "worker", t as i64);
                    engine.composite_monitor_started(&inner);

                    let leaf = Monitor::event(format!("t{}.leaf.{}", t, i), MonitoringLevel::Info);
                    engine.init_monitor(&leaf, true);
                    assert_eq!(leaf.value("worker").and_then(|v| v.as_i64()), Some(t as i64));
                    assert_eq!(engine.stack_depth(), 2);

                    engine.finish_composite(&inner);
                    engine.finish_composite(&outer);
                    assert_eq!(engine.stack_depth(), 0);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(log.seen("recorder", "process").len(), THREADS * ITERATIONS * 2);
}

#[test]
fn test_admin_writes_during_dispatch() {
    let (engine, _log) = running_engine();
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let engine = Arc::clone(&engine);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut n = 0u64;
            while !stop.load(Ordering::Relaxed) {
                engine.set_global("revision", n.to_string());
                let _ = engine.add_monitor_level(&format!("svc.{}", n % 16), MonitoringLevel::Info);
                engine.set_monitoring_enabled(n % 7 != 0);
                n += 1;
            }
            engine.set_monitoring_enabled(true);
        })
    };

    let readers: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..ITERATIONS {
                    let monitor = Monitor::event(format!("svc.{}.{}", t, i), MonitoringLevel::Info);
                    engine.init_monitor(&monitor, true);
                    engine.process(&monitor);
                    let _ = engine.override_level_for_monitor(&monitor);
                }
            })
        })
        .collect();

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
    stop.store(true, Ordering::Relaxed);
    writer.join().expect("writer thread panicked");

    assert!(engine.is_enabled());
}
