/*!
 * Monitoring Levels
 * Ordered verbosity classification used for override decisions
 */

use crate::core::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monitoring level, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum MonitoringLevel {
    Essential = 0,
    Info = 1,
    Debug = 2,
}

impl MonitoringLevel {
    /// Whether a threshold at `self` admits monitors at `level`
    ///
    /// An `Info` threshold admits `Essential` and `Info`, but not `Debug`.
    #[inline]
    pub fn includes(self, level: MonitoringLevel) -> bool {
        level <= self
    }

    /// Whether `self` is strictly less verbose than `other`
    #[inline]
    pub fn has_higher_priority_than(self, other: MonitoringLevel) -> bool {
        self < other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MonitoringLevel::Essential => "ESSENTIAL",
            MonitoringLevel::Info => "INFO",
            MonitoringLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for MonitoringLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitoringLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ESSENTIAL" => Ok(MonitoringLevel::Essential),
            "INFO" => Ok(MonitoringLevel::Info),
            "DEBUG" => Ok(MonitoringLevel::Debug),
            _ => Err(EngineError::InvalidLevel(s.to_string())),
        }
    }
}
