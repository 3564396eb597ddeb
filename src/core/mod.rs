/*!
 * Core Module
 * Fundamental engine types, limits and error handling
 */

pub mod errors;
pub mod limits;
pub mod serde;
pub mod shard_manager;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use shard_manager::{ShardManager, WorkloadProfile};
pub use types::*;
