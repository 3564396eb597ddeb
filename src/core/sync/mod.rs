/*!
 * Synchronization Primitives
 */

mod rcu;

pub use rcu::RcuCell;
