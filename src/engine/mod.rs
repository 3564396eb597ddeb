/*!
 * Engine Module
 * Orchestrator, construction, configuration and the dispatch failure boundary
 */

mod builder;
pub mod config;
mod dispatch;
mod orchestrator;

pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub use orchestrator::{MonitoringEngine, StartupHook};
