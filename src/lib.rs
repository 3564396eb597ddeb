/*!
 * Monitoring Engine Library
 *
 * In-process instrumentation core: monitors carrying typed attributes,
 * per-context nesting of composite monitors with attribute inheritance,
 * runtime level overrides, and fault-isolated dispatch to processors.
 */

pub mod core;
pub mod correlation;
pub mod engine;
pub mod monitor;
pub mod overrides;
pub mod processor;
pub mod tracer;

// Re-exports
pub use crate::core::errors::EngineError;
pub use crate::core::types::{EngineResult, MonitorId};
pub use correlation::{Completion, ContextKey, CorrelationStrategy, StackCorrelationStrategy};
pub use engine::{EngineBuilder, EngineConfig, MonitoringEngine};
pub use monitor::{
    keys, AttributeHolder, AttributeMap, AttributeValue, Monitor, MonitorKind, MonitorRef,
    MonitoringLevel, Transaction,
};
pub use overrides::LevelOverrides;
pub use processor::{
    Decomposer, JsonDecomposer, MonitorProcessor, ProcessorFactory, ProcessorRef,
    SimpleProcessorFactory,
};
pub use tracer::{init_tracing, try_init_tracing};
