/*!
 * Processor Dispatch
 *
 * The failure boundary between the engine and its collaborators. Errors and
 * panics from processor-list resolution or from any processor callback are
 * converted into a logged event; nothing propagates to the caller, and one
 * failing processor never prevents the remaining ones from running.
 */

use crate::monitor::MonitorRef;
use crate::processor::{MonitorProcessor, ProcessorFactory};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, debug_span, warn, Level};

/// Lifecycle callback being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Callback {
    Created,
    Started,
    Process,
}

impl Callback {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Callback::Created => "monitor_created",
            Callback::Started => "monitor_started",
            Callback::Process => "process",
        }
    }

    fn invoke(self, processor: &dyn MonitorProcessor, monitor: &MonitorRef) -> anyhow::Result<()> {
        match self {
            Callback::Created => processor.monitor_created(monitor),
            Callback::Started => processor.monitor_started(monitor),
            Callback::Process => processor.process(monitor),
        }
    }
}

/// Failure caught at the boundary
#[derive(Debug)]
pub(crate) enum Failure {
    Error(anyhow::Error),
    Panic(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(err) => write!(f, "{:#}", err),
            Failure::Panic(message) => write!(f, "panicked: {}", message),
        }
    }
}

/// Run `f`, converting both errors and panics into a [`Failure`]
pub(crate) fn guarded<T, F>(f: F) -> Result<T, Failure>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(Failure::Error(err)),
        Err(payload) => Err(Failure::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Invoke `callback` on every processor the factory selects for `monitor`
pub(crate) fn dispatch(factory: &dyn ProcessorFactory, monitor: &MonitorRef, callback: Callback) {
    let _span = debug_span!("dispatch", monitor_id = monitor.id(), callback = callback.as_str()).entered();

    let processors = match guarded(|| factory.processors_for_monitor(monitor)) {
        Ok(processors) => processors,
        Err(failure) => {
            warn!(
                monitor = %monitor,
                callback = callback.as_str(),
                error = %failure,
                "failed to resolve processors for monitor; application is unaffected"
            );
            return;
        }
    };

    if tracing::enabled!(Level::DEBUG) {
        let names: Vec<&str> = processors.iter().map(|p| p.name()).collect();
        debug!(monitor = %monitor, callback = callback.as_str(), processors = ?names, "dispatching monitor");
    }

    for processor in &processors {
        if let Err(failure) = guarded(|| callback.invoke(processor.as_ref(), monitor)) {
            warn!(
                monitor = %monitor,
                processor = processor.name(),
                callback = callback.as_str(),
                error = %failure,
                "processor failed while handling monitor; application is unaffected"
            );
        }
    }
}
