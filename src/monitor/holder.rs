/*!
 * Attribute Holder
 * A value plus its serializable and locked metadata flags
 */

use super::value::AttributeValue;
use serde::{Deserialize, Serialize};

/// Attribute value with metadata flags
///
/// Once `locked`, the value never changes again. `serializable` marks the
/// holder as eligible for decomposition into a wire/storage form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeHolder {
    value: AttributeValue,
    serializable: bool,
    locked: bool,
}

impl AttributeHolder {
    pub fn new(value: impl Into<AttributeValue>) -> Self {
        Self {
            value: value.into(),
            serializable: false,
            locked: false,
        }
    }

    #[inline]
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    #[inline]
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Mark as eligible for decomposition
    pub fn serializable(&mut self) -> &mut Self {
        self.serializable = true;
        self
    }

    /// Freeze the value
    pub fn lock(&mut self) -> &mut Self {
        self.locked = true;
        self
    }

    /// Builder form of [`serializable`](Self::serializable)
    pub fn with_serializable(mut self, serializable: bool) -> Self {
        self.serializable = serializable;
        self
    }

    /// Builder form of [`lock`](Self::lock)
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Replace the value unless locked; returns whether it took effect
    pub(crate) fn replace(&mut self, value: AttributeValue) -> bool {
        if self.locked {
            return false;
        }
        self.value = value;
        true
    }

    /// Copy of the value carrying over both flags
    pub(crate) fn copy_flags_from(&mut self, other: &AttributeHolder) -> &mut Self {
        if other.serializable {
            self.serializable = true;
        }
        if other.locked {
            self.locked = true;
        }
        self
    }
}
