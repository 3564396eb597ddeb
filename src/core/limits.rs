/*!
 * Engine Limits and Constants
 *
 * Centralized location for fixed ceilings and well-known defaults.
 */

// =============================================================================
// LEVEL OVERRIDES
// =============================================================================

/// Maximum number of distinct monitor-name prefixes in the override table
/// Exceeding it is a configuration error, never a silent eviction
pub const MAX_LEVEL_OVERRIDES: usize = 128;

// =============================================================================
// CORRELATION
// =============================================================================

/// Initial capacity of a freshly created per-context nesting stack
/// Most instrumented call chains nest only a handful of spans deep
pub const INITIAL_STACK_CAPACITY: usize = 8;

// =============================================================================
// LOGGING
// =============================================================================

/// Environment variable enabling JSON log output
pub const TRACE_JSON_ENV: &str = "MONITORING_TRACE_JSON";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
