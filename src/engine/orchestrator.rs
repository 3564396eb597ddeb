/*!
 * Monitoring Engine
 *
 * Process-wide lifecycle, the enabled gate, the four monitor lifecycle calls
 * and fault-isolated dispatch to processors.
 *
 * Lifecycle: STOPPED -> startup() -> RUNNING -> shutdown() -> STOPPED.
 * Lifecycle transitions must be serialized by the caller; every other
 * operation is safe to call concurrently from any thread.
 */

use super::builder::EngineBuilder;
use super::config::EngineConfig;
use super::dispatch::{self, Callback};
use crate::core::errors::EngineError;
use crate::core::sync::RcuCell;
use crate::core::types::EngineResult;
use crate::correlation::{Completion, ContextKey, CorrelationStrategy};
use crate::monitor::{
    keys, AttributeHolder, AttributeMap, AttributeValue, Monitor, MonitorRef, MonitoringLevel,
};
use crate::overrides::LevelOverrides;
use crate::processor::{Decomposer, ProcessorFactory};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Callback run at the end of `startup()`
pub type StartupHook = Arc<dyn Fn() + Send + Sync>;

/// Monitoring engine handle
///
/// Construct once with [`MonitoringEngine::builder`] and share the returned
/// `Arc` with instrumented code.
pub struct MonitoringEngine {
    pub(super) monitoring_enabled: AtomicBool,
    pub(super) running: AtomicBool,
    pub(super) config: RwLock<EngineConfig>,
    pub(super) processor_factory: RwLock<Option<Arc<dyn ProcessorFactory>>>,
    pub(super) decomposer: RwLock<Option<Arc<dyn Decomposer>>>,
    pub(super) correlation_strategy: RwLock<Option<Arc<dyn CorrelationStrategy>>>,
    pub(super) global_attributes: RcuCell<AttributeMap>,
    pub(super) overrides: Arc<LevelOverrides>,
    pub(super) startup_hook: Mutex<Option<StartupHook>>,
}

impl MonitoringEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Start the engine
    ///
    /// Fails if the processor factory, decomposer or correlation strategy is
    /// unset, or if the configured override tables are invalid.
    pub fn startup(&self) -> EngineResult<()> {
        info!("Monitoring engine starting up");

        let factory = self
            .processor_factory()
            .ok_or_else(|| EngineError::missing("processor factory"))?;
        if self.decomposer().is_none() {
            return Err(EngineError::missing("decomposer"));
        }
        let strategy = self
            .correlation_strategy()
            .ok_or_else(|| EngineError::missing("correlation strategy"))?;

        let config = self.config.read().clone();
        self.overrides
            .apply_all(&config.processor_levels, &config.monitor_levels)?;

        strategy.startup();
        factory.startup();
        self.running.store(true, Ordering::Release);

        let hook = self.startup_hook.lock().clone();
        if let Some(hook) = hook {
            hook();
        }

        info!(
            enabled = self.monitoring_enabled.load(Ordering::Acquire),
            "Monitoring engine running"
        );
        Ok(())
    }

    /// Stop the engine, dropping globals, overrides and all open stacks
    ///
    /// No-op when already stopped.
    pub fn shutdown(&self) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        info!("Monitoring engine shutting down");

        self.global_attributes.store(AttributeMap::new());
        self.overrides.clear();
        self.running.store(false, Ordering::Release);

        if let Some(factory) = self.processor_factory() {
            factory.shutdown();
        }
        if let Some(strategy) = self.correlation_strategy() {
            strategy.shutdown();
        }

        info!("Monitoring engine stopped");
    }

    pub fn restart(&self) -> EngineResult<()> {
        self.shutdown();
        self.startup()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_monitoring_enabled(&self) -> bool {
        self.monitoring_enabled.load(Ordering::Acquire)
    }

    /// The gate checked by every per-monitor operation
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.is_monitoring_enabled() && self.is_running()
    }

    pub fn set_monitoring_enabled(&self, enabled: bool) {
        let previous = self.monitoring_enabled.swap(enabled, Ordering::AcqRel);
        if previous != enabled {
            info!(enabled, "Monitoring toggled");
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }

    /// Replace the configuration used by the next `startup()`
    pub fn set_config(&self, config: EngineConfig) {
        *self.config.write() = config;
    }

    pub fn set_startup_hook<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.startup_hook.lock() = Some(Arc::new(hook));
    }

    // =========================================================================
    // COLLABORATORS
    // =========================================================================

    pub fn processor_factory(&self) -> Option<Arc<dyn ProcessorFactory>> {
        self.processor_factory.read().clone()
    }

    pub fn set_processor_factory(&self, factory: Option<Arc<dyn ProcessorFactory>>) {
        *self.processor_factory.write() = factory;
    }

    pub fn decomposer(&self) -> Option<Arc<dyn Decomposer>> {
        self.decomposer.read().clone()
    }

    pub fn set_decomposer(&self, decomposer: Option<Arc<dyn Decomposer>>) {
        *self.decomposer.write() = decomposer;
    }

    pub fn correlation_strategy(&self) -> Option<Arc<dyn CorrelationStrategy>> {
        self.correlation_strategy.read().clone()
    }

    pub fn set_correlation_strategy(&self, strategy: Option<Arc<dyn CorrelationStrategy>>) {
        *self.correlation_strategy.write() = strategy;
    }

    /// Override tables, shareable with a level-filtering factory
    pub fn level_overrides(&self) -> Arc<LevelOverrides> {
        Arc::clone(&self.overrides)
    }

    // =========================================================================
    // MONITOR LIFECYCLE
    // =========================================================================

    /// Write reserved attributes, then globals, then inherited attributes
    ///
    /// Reserved keys are locked and serializable. Globals and inherited
    /// attributes never overwrite a key the monitor already holds.
    pub fn init_monitor(&self, monitor: &Monitor, include_inheritables: bool) {
        if !self.is_enabled() {
            return;
        }

        let inherited = if include_inheritables {
            self.inheritable_attributes()
        } else {
            AttributeMap::new()
        };
        let globals = self.global_attributes.load();

        let mut attributes = monitor.attributes_mut();
        attributes.set(keys::NAME, monitor.name()).serializable().lock();
        attributes
            .set(keys::CREATED_AT, SystemTime::now())
            .serializable()
            .lock();
        attributes
            .set(keys::THREAD_ID, ContextKey::current().to_hex())
            .serializable()
            .lock();

        for (key, holder) in globals.iter() {
            attributes.inherit(key, holder);
        }
        for (key, holder) in inherited.iter() {
            attributes.inherit(key, holder);
        }
    }

    /// `init_monitor` using the configured inheritance default
    pub fn init_monitor_default(&self, monitor: &Monitor) {
        let include_inheritables = self.config.read().include_inheritables;
        self.init_monitor(monitor, include_inheritables);
    }

    pub fn monitor_created(&self, monitor: &MonitorRef) {
        if !self.is_enabled() {
            return;
        }
        self.dispatch(monitor, Callback::Created);
    }

    pub fn monitor_started(&self, monitor: &MonitorRef) {
        if !self.is_enabled() {
            return;
        }
        self.dispatch(monitor, Callback::Started);
    }

    /// Attach to the innermost open composite, then dispatch to processors
    pub fn process(&self, monitor: &MonitorRef) {
        if !self.is_enabled() {
            return;
        }
        if let Some(strategy) = self.correlation_strategy() {
            strategy.process_monitor_for_composite(monitor);
        }
        self.dispatch(monitor, Callback::Process);
    }

    /// Fire a one-shot event: init, created, then process
    pub fn event<K, V, I>(&self, name: &str, level: MonitoringLevel, attributes: I) -> MonitorRef
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let monitor = Monitor::event(name, level);
        self.init_monitor_default(&monitor);
        monitor.attributes_mut().set_all(attributes);
        self.monitor_created(&monitor);
        self.process(&monitor);
        monitor
    }

    fn dispatch(&self, monitor: &MonitorRef, callback: Callback) {
        match self.processor_factory() {
            Some(factory) => dispatch::dispatch(factory.as_ref(), monitor, callback),
            None => debug!(
                monitor = %monitor,
                callback = callback.as_str(),
                "no processor factory set; skipping dispatch"
            ),
        }
    }

    // =========================================================================
    // COMPOSITES
    // =========================================================================

    pub fn composite_monitor_started(&self, monitor: &MonitorRef) {
        if !self.is_enabled() {
            return;
        }
        if let Some(strategy) = self.correlation_strategy() {
            strategy.composite_monitor_started(monitor);
        }
    }

    /// Pop `monitor` from the calling context's stack
    ///
    /// Composites that were still open above it are finished first with a
    /// process dispatch, innermost first. Returns whether `monitor` was open.
    /// The caller is still responsible for calling `process(monitor)`.
    pub fn composite_monitor_completed(&self, monitor: &MonitorRef) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let Some(strategy) = self.correlation_strategy() else {
            return false;
        };

        match strategy.composite_monitor_completed(monitor) {
            Completion::Completed { abandoned } => {
                for missed in &abandoned {
                    self.dispatch(missed, Callback::Process);
                }
                true
            }
            Completion::NotFound => false,
        }
    }

    /// `composite_monitor_completed` followed by `process`
    pub fn finish_composite(&self, monitor: &MonitorRef) {
        self.composite_monitor_completed(monitor);
        self.process(monitor);
    }

    /// Most recently started open composite named `name` on the calling context
    pub fn composite_monitor_named(&self, name: &str) -> EngineResult<Option<MonitorRef>> {
        match self.correlation_strategy() {
            Some(strategy) => strategy.composite_monitor_named(name),
            None if name.is_empty() => Err(EngineError::invalid_argument("composite monitor name")),
            None => Ok(None),
        }
    }

    /// Attributes a monitor created now on the calling context would inherit
    pub fn inheritable_attributes(&self) -> AttributeMap {
        self.correlation_strategy()
            .map(|strategy| strategy.inheritable_attributes())
            .unwrap_or_default()
    }

    /// Propagate `holder` under `key` from an open composite to its descendants
    pub fn set_inheritable(&self, composite: &Monitor, key: &str, holder: AttributeHolder) {
        if !self.is_enabled() {
            return;
        }
        if let Some(strategy) = self.correlation_strategy() {
            strategy.set_inheritable(composite, key, holder);
        }
    }

    /// Set an attribute on `composite` and mark it inheritable
    pub fn set_inheritable_attribute(
        &self,
        composite: &Monitor,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> AttributeHolder {
        let holder = composite.set(key, value);
        self.set_inheritable(composite, key, holder.clone());
        holder
    }

    /// Discard the calling context's stack without dispatching anything
    pub fn clear_current_thread(&self) -> usize {
        self.correlation_strategy()
            .map(|strategy| strategy.clear_current_thread())
            .unwrap_or(0)
    }

    /// Open composites on the calling context
    pub fn stack_depth(&self) -> usize {
        self.correlation_strategy()
            .map(|strategy| strategy.stack_depth())
            .unwrap_or(0)
    }

    // =========================================================================
    // SERIALIZATION
    // =========================================================================

    /// Decompose every serializable holder in `attributes`
    ///
    /// Empty when the engine is disabled.
    pub fn make_attribute_holders_serializable(
        &self,
        attributes: &AttributeMap,
    ) -> HashMap<String, serde_json::Value> {
        if !self.is_enabled() {
            return HashMap::new();
        }
        let Some(decomposer) = self.decomposer() else {
            debug!("no decomposer set; nothing serialized");
            return HashMap::new();
        };

        attributes
            .iter()
            .filter(|(_, holder)| holder.is_serializable())
            .map(|(key, holder)| (key.clone(), decomposer.decompose(holder)))
            .collect()
    }

    // =========================================================================
    // GLOBAL ATTRIBUTES
    // =========================================================================

    /// Set a process-wide attribute applied to every monitor at init
    ///
    /// Not marked serializable. A locked global is left unchanged.
    pub fn set_global_attribute(
        &self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> AttributeHolder {
        self.global_attributes
            .modify(|globals| globals.set(key, value).clone())
    }

    pub fn set_global_attributes<K, V, I>(&self, values: I)
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.global_attributes.modify(|globals| globals.set_all(values));
    }

    /// Set a string global marked serializable
    pub fn set_global(&self, key: impl Into<String>, value: impl Into<String>) -> AttributeHolder {
        let value: String = value.into();
        self.global_attributes
            .modify(|globals| globals.set(key, value).serializable().clone())
    }

    pub fn lock_global_attribute(&self, key: &str) -> bool {
        self.global_attributes.modify(|globals| globals.lock(key))
    }

    /// Snapshot of the global attributes
    pub fn global_attributes(&self) -> Arc<AttributeMap> {
        self.global_attributes.load()
    }

    // =========================================================================
    // LEVEL OVERRIDES
    // =========================================================================

    pub fn add_processor_level(&self, name: &str, level: MonitoringLevel) -> EngineResult<()> {
        self.overrides.add_processor_level(name, level)
    }

    pub fn processor_level(&self, name: &str) -> Option<MonitoringLevel> {
        self.overrides.processor_level(name)
    }

    pub fn add_monitor_level(&self, prefix: &str, level: MonitoringLevel) -> EngineResult<()> {
        self.overrides.add_monitor_level(prefix, level)
    }

    pub fn override_level_for_monitor(&self, monitor: &Monitor) -> Option<MonitoringLevel> {
        self.overrides.level_for_monitor(monitor)
    }

    pub fn override_processor_levels_listing(&self) -> String {
        self.overrides.processor_levels_listing()
    }

    pub fn override_monitor_levels_listing(&self) -> String {
        self.overrides.monitor_levels_listing()
    }
}

impl fmt::Debug for MonitoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringEngine")
            .field("monitoring_enabled", &self.is_monitoring_enabled())
            .field("running", &self.is_running())
            .field("globals", &self.global_attributes.load().len())
            .field("monitor_overrides", &self.overrides.monitor_level_count())
            .finish_non_exhaustive()
    }
}
