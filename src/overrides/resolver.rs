/*!
 * Level Override Resolver
 * Runtime level substitution keyed by processor name or monitor-name prefix
 *
 * Both tables are read on every dispatch and written by rare administrative
 * calls, so they are published as copy-on-write snapshots.
 */

use crate::core::errors::EngineError;
use crate::core::limits::MAX_LEVEL_OVERRIDES;
use crate::core::sync::RcuCell;
use crate::core::types::EngineResult;
use crate::monitor::{Monitor, MonitoringLevel};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use tracing::info;

/// Processor and monitor level override tables
#[derive(Debug, Default)]
pub struct LevelOverrides {
    processor_levels: RcuCell<HashMap<String, MonitoringLevel>>,
    /// Ordered so that reverse iteration visits lexically greater prefixes first
    monitor_levels: RcuCell<BTreeMap<String, MonitoringLevel>>,
}

impl LevelOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite the override for an exact processor name
    pub fn add_processor_level(&self, name: &str, level: MonitoringLevel) -> EngineResult<()> {
        if name.is_empty() {
            return Err(EngineError::invalid_argument("processor name must not be empty"));
        }

        self.processor_levels
            .modify(|levels| levels.insert(name.to_string(), level));
        info!(processor = name, %level, "processor level override registered");
        Ok(())
    }

    /// Exact-match processor override
    pub fn processor_level(&self, name: &str) -> Option<MonitoringLevel> {
        self.processor_levels.load().get(name).copied()
    }

    /// Register or overwrite the override for a monitor-name prefix
    ///
    /// Fails once more than [`MAX_LEVEL_OVERRIDES`] distinct prefixes would be
    /// held. Overwriting an already registered prefix always succeeds.
    pub fn add_monitor_level(&self, prefix: &str, level: MonitoringLevel) -> EngineResult<()> {
        if prefix.is_empty() {
            return Err(EngineError::invalid_argument("monitor name prefix must not be empty"));
        }

        self.monitor_levels.try_modify(|levels| {
            if !levels.contains_key(prefix) && levels.len() >= MAX_LEVEL_OVERRIDES {
                return Err(EngineError::CapacityExceeded {
                    limit: MAX_LEVEL_OVERRIDES,
                });
            }
            levels.insert(prefix.to_string(), level);
            Ok(())
        })?;

        info!(prefix, %level, "monitor level override registered");
        Ok(())
    }

    /// Override level for `monitor`, resolved against its name
    pub fn level_for_monitor(&self, monitor: &Monitor) -> Option<MonitoringLevel> {
        self.level_for_name(monitor.name())
    }

    /// First registered prefix of `name` in reverse-lexicographic order
    ///
    /// With `svc.a` and `svc.a.sub` registered, `svc.a.sub.op` resolves to
    /// `svc.a.sub`, because it sorts after `svc.a`.
    pub fn level_for_name(&self, name: &str) -> Option<MonitoringLevel> {
        self.monitor_levels
            .load()
            .iter()
            .rev()
            .find(|(prefix, _)| name.starts_with(prefix.as_str()))
            .map(|(_, level)| *level)
    }

    pub fn monitor_level_count(&self) -> usize {
        self.monitor_levels.load().len()
    }

    /// `{name=LEVEL, ...}` sorted by processor name
    pub fn processor_levels_listing(&self) -> String {
        let levels = self.processor_levels.load();
        let mut entries: Vec<_> = levels.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        render_listing(entries)
    }

    /// `{prefix=LEVEL, ...}` in resolution order
    pub fn monitor_levels_listing(&self) -> String {
        render_listing(self.monitor_levels.load().iter().rev())
    }

    /// Register a batch of overrides, all or nothing
    ///
    /// Every name and prefix is validated, and the prefix capacity checked
    /// against the combined table, before either table is published.
    pub fn apply_all<'a, P, M>(&self, processor_levels: P, monitor_levels: M) -> EngineResult<()>
    where
        P: IntoIterator<Item = (&'a String, &'a MonitoringLevel)>,
        M: IntoIterator<Item = (&'a String, &'a MonitoringLevel)>,
    {
        let processor_levels: Vec<_> = processor_levels.into_iter().collect();
        if processor_levels.iter().any(|(name, _)| name.is_empty()) {
            return Err(EngineError::invalid_argument("processor name must not be empty"));
        }

        let added = self.monitor_levels.try_modify(|levels| {
            let mut added = 0usize;
            for (prefix, level) in monitor_levels {
                if prefix.is_empty() {
                    return Err(EngineError::invalid_argument("monitor name prefix must not be empty"));
                }
                if !levels.contains_key(prefix) && levels.len() >= MAX_LEVEL_OVERRIDES {
                    return Err(EngineError::CapacityExceeded {
                        limit: MAX_LEVEL_OVERRIDES,
                    });
                }
                levels.insert(prefix.clone(), *level);
                added += 1;
            }
            Ok(added)
        })?;

        self.processor_levels.modify(|levels| {
            levels.extend(processor_levels.iter().map(|(name, level)| ((*name).clone(), **level)))
        });

        info!(
            processors = processor_levels.len(),
            prefixes = added,
            "level overrides applied"
        );
        Ok(())
    }

    pub fn clear(&self) {
        self.processor_levels.store(HashMap::new());
        self.monitor_levels.store(BTreeMap::new());
    }
}

fn render_listing<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a MonitoringLevel)>,
{
    let mut out = String::from("{");
    for (i, (key, level)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}={}", key, level);
    }
    out.push('}');
    out
}
