/*!
 * Level Overrides
 */

mod resolver;

pub use resolver::LevelOverrides;
