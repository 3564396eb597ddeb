/*!
 * Monitor Module
 * Attribute store, monitor entity, levels and the transaction scope
 */

mod attribute_map;
mod entity;
mod holder;
pub mod keys;
mod level;
mod transaction;
mod value;

pub use attribute_map::AttributeMap;
pub use entity::{Monitor, MonitorKind, MonitorRef};
pub use holder::AttributeHolder;
pub use level::MonitoringLevel;
pub use transaction::Transaction;
pub use value::AttributeValue;
