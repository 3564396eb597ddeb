/*!
 * Monitor Entity
 * The instrumented operation: a name, an optional level and an attribute map
 */

use super::attribute_map::AttributeMap;
use super::holder::AttributeHolder;
use super::level::MonitoringLevel;
use super::value::AttributeValue;
use crate::core::types::MonitorId;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_MONITOR_ID: AtomicU64 = AtomicU64::new(1);

/// Shared monitor handle, as held by nesting stacks and processors
pub type MonitorRef = Arc<Monitor>;

/// Whether a monitor participates in per-context nesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorKind {
    /// One-shot event or counter
    Event,
    /// Span that nests on the calling context's stack
    Composite,
}

/// Instrumented operation
///
/// The attribute map sits behind an uncontended lock so that a monitor can
/// be shared between its owning call stack, the nesting stack and the
/// processors running on the same thread during dispatch.
pub struct Monitor {
    id: MonitorId,
    kind: MonitorKind,
    name: String,
    level: Option<MonitoringLevel>,
    attributes: RwLock<AttributeMap>,
    children: Mutex<Vec<MonitorRef>>,
}

impl Monitor {
    pub fn new(kind: MonitorKind, name: impl Into<String>, level: Option<MonitoringLevel>) -> MonitorRef {
        Arc::new(Self {
            id: NEXT_MONITOR_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            name: name.into(),
            level,
            attributes: RwLock::new(AttributeMap::new()),
            children: Mutex::new(Vec::new()),
        })
    }

    /// One-shot event monitor
    pub fn event(name: impl Into<String>, level: MonitoringLevel) -> MonitorRef {
        Self::new(MonitorKind::Event, name, Some(level))
    }

    /// Nesting composite monitor
    pub fn composite(name: impl Into<String>, level: MonitoringLevel) -> MonitorRef {
        Self::new(MonitorKind::Composite, name, Some(level))
    }

    #[inline]
    pub fn id(&self) -> MonitorId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> MonitorKind {
        self.kind
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        self.kind == MonitorKind::Composite
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn level(&self) -> Option<MonitoringLevel> {
        self.level
    }

    /// Set an attribute, returning the resulting holder
    ///
    /// A locked attribute is left untouched and its current holder returned.
    pub fn set(&self, key: impl Into<String>, value: impl Into<AttributeValue>) -> AttributeHolder {
        self.attributes.write().set(key, value).clone()
    }

    pub fn get(&self, key: &str) -> Option<AttributeHolder> {
        self.attributes.read().get(key).cloned()
    }

    pub fn value(&self, key: &str) -> Option<AttributeValue> {
        self.attributes.read().value(key).cloned()
    }

    pub fn get_as_string(&self, key: &str) -> Option<String> {
        self.value(key).map(|v| v.to_string())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.read().has_attribute(key)
    }

    pub fn lock_attribute(&self, key: &str) -> bool {
        self.attributes.write().lock(key)
    }

    pub fn mark_serializable(&self, key: &str) -> bool {
        self.attributes.write().mark_serializable(key)
    }

    /// Read access to the attribute map
    ///
    /// Do not call mutating monitor methods while holding the guard.
    pub fn attributes(&self) -> RwLockReadGuard<'_, AttributeMap> {
        self.attributes.read()
    }

    pub fn attributes_mut(&self) -> RwLockWriteGuard<'_, AttributeMap> {
        self.attributes.write()
    }

    /// Copy of the current attribute map
    pub fn snapshot(&self) -> AttributeMap {
        self.attributes.read().clone()
    }

    /// Monitors processed while this composite was innermost on its stack
    pub fn children(&self) -> Vec<MonitorRef> {
        self.children.lock().clone()
    }

    pub(crate) fn add_child(&self, child: MonitorRef) {
        self.children.lock().push(child);
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(f, "{}#{}[{}]", self.name, self.id, level),
            None => write!(f, "{}#{}", self.name, self.id),
        }
    }
}
