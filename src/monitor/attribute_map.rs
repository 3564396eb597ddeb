/*!
 * Attribute Map
 * Named attribute holders owned by a single monitor
 */

use super::holder::AttributeHolder;
use super::value::AttributeValue;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// Attribute name to holder mapping
///
/// Not synchronized: a map belongs to one monitor, which is mutated by one
/// logical execution context at a time.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMap {
    attributes: HashMap<String, AttributeHolder, RandomState>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value
    ///
    /// If the key exists and is locked, the existing holder is returned
    /// unmodified: callers must not assume their value took effect.
    /// Overwriting an unlocked holder keeps its serializable flag.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> &mut AttributeHolder {
        match self.attributes.entry(key.into()) {
            Entry::Occupied(entry) => {
                let holder = entry.into_mut();
                if !holder.replace(value.into()) {
                    tracing::trace!("ignoring set on locked attribute");
                }
                holder
            }
            Entry::Vacant(entry) => entry.insert(AttributeHolder::new(value)),
        }
    }

    /// Set every value in `values`, honoring locks
    pub fn set_all<K, V, I>(&mut self, values: I)
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in values {
            self.set(key, value);
        }
    }

    /// Copy `holder` under `key` with its flags, unless the key already exists
    ///
    /// Returns whether the attribute was applied.
    pub fn inherit(&mut self, key: &str, holder: &AttributeHolder) -> bool {
        if self.attributes.contains_key(key) {
            return false;
        }
        self.set(key, holder.value().clone()).copy_flags_from(holder);
        true
    }

    /// Insert `holder` as-is, replacing any existing holder regardless of locks
    pub(crate) fn put(&mut self, key: String, holder: AttributeHolder) {
        self.attributes.insert(key, holder);
    }

    pub fn get(&self, key: &str) -> Option<&AttributeHolder> {
        self.attributes.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut AttributeHolder> {
        self.attributes.get_mut(key)
    }

    pub fn value(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key).map(AttributeHolder::value)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Lock an existing attribute; returns false if absent
    pub fn lock(&mut self, key: &str) -> bool {
        self.attributes.get_mut(key).map(|h| h.lock()).is_some()
    }

    /// Mark an existing attribute serializable; returns false if absent
    pub fn mark_serializable(&mut self, key: &str) -> bool {
        self.attributes
            .get_mut(key)
            .map(|h| h.serializable())
            .is_some()
    }

    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    pub fn get_all(&self) -> &HashMap<String, AttributeHolder, RandomState> {
        &self.attributes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeHolder)> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Debug for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.attributes.iter().collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map()
            .entries(keys.into_iter().map(|(k, h)| (k, h.value())))
            .finish()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        map.set_all(iter);
        map
    }
}
