/*!
 * Reserved Attribute Keys
 */

/// Operation name, written during initialization
pub const NAME: &str = "name";

/// Creation timestamp, written during initialization
pub const CREATED_AT: &str = "createdAt";

/// Owning execution context (hex), written during initialization
pub const THREAD_ID: &str = "threadId";

/// Transaction start timestamp
pub const START_TIME: &str = "startTime";

/// Transaction end timestamp
pub const END_TIME: &str = "endTime";

/// Transaction latency in milliseconds
pub const LATENCY: &str = "latency";

/// Whether the transaction failed
pub const FAILED: &str = "failed";

/// Failure description for failed transactions
pub const FAILURE_REASON: &str = "failureReason";

