/*!
 * Core Types
 * Common types used across the engine
 */

/// Process-unique monitor identity
pub type MonitorId = u64;

/// Process-unique execution context identity
pub type ContextId = u64;

/// Latency in milliseconds
pub type Millis = u64;

/// Common result type for administrative engine operations
pub type EngineResult<T> = Result<T, super::errors::EngineError>;
