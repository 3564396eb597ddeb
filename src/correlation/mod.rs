/*!
 * Correlation
 * Per-context nesting of composite monitors and attribute inheritance
 */

mod context;
mod stack;
mod traits;

pub use context::ContextKey;
pub use stack::StackCorrelationStrategy;
pub use traits::{Completion, CorrelationStrategy};
