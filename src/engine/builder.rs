/*!
 * Monitoring Engine Builder
 * Builder pattern for MonitoringEngine construction
 */

use super::config::EngineConfig;
use super::orchestrator::{MonitoringEngine, StartupHook};
use crate::core::sync::RcuCell;
use crate::correlation::{CorrelationStrategy, StackCorrelationStrategy};
use crate::monitor::AttributeMap;
use crate::overrides::LevelOverrides;
use crate::processor::{Decomposer, ProcessorFactory};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Builder for MonitoringEngine
///
/// The engine is built stopped; call `startup()` once collaborators are set.
pub struct EngineBuilder {
    config: EngineConfig,
    processor_factory: Option<Arc<dyn ProcessorFactory>>,
    decomposer: Option<Arc<dyn Decomposer>>,
    correlation_strategy: Option<Arc<dyn CorrelationStrategy>>,
    level_overrides: Option<Arc<LevelOverrides>>,
    startup_hook: Option<StartupHook>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            processor_factory: None,
            decomposer: None,
            correlation_strategy: None,
            level_overrides: None,
            startup_hook: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_processor_factory(mut self, factory: Arc<dyn ProcessorFactory>) -> Self {
        self.processor_factory = Some(factory);
        self
    }

    pub fn with_decomposer(mut self, decomposer: Arc<dyn Decomposer>) -> Self {
        self.decomposer = Some(decomposer);
        self
    }

    /// Replace the default per-context stack strategy
    pub fn with_correlation_strategy(mut self, strategy: Arc<dyn CorrelationStrategy>) -> Self {
        self.correlation_strategy = Some(strategy);
        self
    }

    /// Share an override table with other components, e.g. a level-filtering factory
    pub fn with_level_overrides(mut self, overrides: Arc<LevelOverrides>) -> Self {
        self.level_overrides = Some(overrides);
        self
    }

    /// Callback run once at the end of every successful `startup()`
    pub fn with_startup_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.startup_hook = Some(Arc::new(hook));
        self
    }

    /// Build the engine handle
    pub fn build(self) -> Arc<MonitoringEngine> {
        let strategy = self
            .correlation_strategy
            .unwrap_or_else(|| Arc::new(StackCorrelationStrategy::new()));

        let mut features = Vec::new();
        if self.processor_factory.is_some() {
            features.push("processor-factory");
        }
        if self.decomposer.is_some() {
            features.push("decomposer");
        }
        if self.level_overrides.is_some() {
            features.push("shared-overrides");
        }
        if self.startup_hook.is_some() {
            features.push("startup-hook");
        }
        if !self.config.monitoring_enabled {
            features.push("disabled");
        }

        info!(features = %features.join(", "), "Monitoring engine initialized");

        Arc::new(MonitoringEngine {
            monitoring_enabled: AtomicBool::new(self.config.monitoring_enabled),
            running: AtomicBool::new(false),
            config: RwLock::new(self.config),
            processor_factory: RwLock::new(self.processor_factory),
            decomposer: RwLock::new(self.decomposer),
            correlation_strategy: RwLock::new(Some(strategy)),
            global_attributes: RcuCell::new(AttributeMap::new()),
            overrides: self.level_overrides.unwrap_or_default(),
            startup_hook: Mutex::new(self.startup_hook),
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
