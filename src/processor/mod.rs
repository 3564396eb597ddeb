/*!
 * Processors
 * Processor, factory and decomposer contracts plus default implementations
 */

mod decomposer;
mod factory;
mod traits;

pub use decomposer::JsonDecomposer;
pub use factory::SimpleProcessorFactory;
pub use traits::{Decomposer, MonitorProcessor, ProcessorFactory, ProcessorRef};
