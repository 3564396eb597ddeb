/*!
 * Engine Configuration
 *
 * Environment variables:
 * - MONITORING_ENABLED: master switch (default: true)
 * - MONITORING_INCLUDE_INHERITABLES: default for init_monitor_default (default: true)
 * - MONITORING_PROCESSOR_LEVELS: `name=LEVEL,name=LEVEL`
 * - MONITORING_MONITOR_LEVELS: `prefix=LEVEL,prefix=LEVEL`
 */

use crate::core::errors::EngineError;
use crate::core::types::EngineResult;
use crate::monitor::MonitoringLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ENABLED_ENV: &str = "MONITORING_ENABLED";
pub const INCLUDE_INHERITABLES_ENV: &str = "MONITORING_INCLUDE_INHERITABLES";
pub const PROCESSOR_LEVELS_ENV: &str = "MONITORING_PROCESSOR_LEVELS";
pub const MONITOR_LEVELS_ENV: &str = "MONITORING_MONITOR_LEVELS";

/// Engine configuration
///
/// The override tables are applied on every `startup()`, since shutdown
/// clears all runtime overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    pub monitoring_enabled: bool,
    pub include_inheritables: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub processor_levels: BTreeMap<String, MonitoringLevel>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub monitor_levels: BTreeMap<String, MonitoringLevel>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monitoring_enabled: true,
            include_inheritables: true,
            processor_levels: BTreeMap::new(),
            monitor_levels: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Configuration with monitoring switched off
    pub fn disabled() -> Self {
        Self {
            monitoring_enabled: false,
            ..Self::default()
        }
    }

    /// Read configuration from `MONITORING_*` environment variables
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENABLED_ENV) {
            config.monitoring_enabled = parse_flag(ENABLED_ENV, &raw)?;
        }
        if let Some(raw) = lookup(INCLUDE_INHERITABLES_ENV) {
            config.include_inheritables = parse_flag(INCLUDE_INHERITABLES_ENV, &raw)?;
        }
        if let Some(raw) = lookup(PROCESSOR_LEVELS_ENV) {
            config.processor_levels = parse_level_table(PROCESSOR_LEVELS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(MONITOR_LEVELS_ENV) {
            config.monitor_levels = parse_level_table(MONITOR_LEVELS_ENV, &raw)?;
        }

        Ok(config)
    }
}

fn parse_flag(var: &str, raw: &str) -> EngineResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(EngineError::Config(format!("{}: expected a boolean, got '{}'", var, other))),
    }
}

fn parse_level_table(var: &str, raw: &str) -> EngineResult<BTreeMap<String, MonitoringLevel>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, level) = entry.split_once('=').ok_or_else(|| {
                EngineError::Config(format!("{}: expected name=LEVEL, got '{}'", var, entry))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(EngineError::Config(format!("{}: empty name in '{}'", var, entry)));
            }
            Ok((name.to_string(), level.parse::<MonitoringLevel>()?))
        })
        .collect()
}
