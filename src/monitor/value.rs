/*!
 * Attribute Values
 * Tagged variant over the supported attribute kinds
 */

use crate::core::serde::system_time_micros;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Attribute value
///
/// Covers the fixed set of primitive kinds plus strings, dates, binary
/// blobs and an arbitrary structured object form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Bool(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(#[serde(with = "system_time_micros")] SystemTime),
    Blob(Vec<u8>),
    Object(serde_json::Value),
}

impl AttributeValue {
    /// Kind name, as used in the serialized tag
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Byte(_) => "byte",
            AttributeValue::Char(_) => "char",
            AttributeValue::Short(_) => "short",
            AttributeValue::Int(_) => "int",
            AttributeValue::Long(_) => "long",
            AttributeValue::Float(_) => "float",
            AttributeValue::Double(_) => "double",
            AttributeValue::String(_) => "string",
            AttributeValue::Date(_) => "date",
            AttributeValue::Blob(_) => "blob",
            AttributeValue::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integral value widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            AttributeValue::Byte(v) => Some(v.into()),
            AttributeValue::Short(v) => Some(v.into()),
            AttributeValue::Int(v) => Some(v.into()),
            AttributeValue::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric value widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            AttributeValue::Float(v) => Some(v.into()),
            AttributeValue::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            AttributeValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<SystemTime> {
        match *self {
            AttributeValue::Date(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Byte(v) => write!(f, "{}", v),
            AttributeValue::Char(v) => write!(f, "{}", v),
            AttributeValue::Short(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Long(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Double(v) => write!(f, "{}", v),
            AttributeValue::String(v) => f.write_str(v),
            AttributeValue::Date(v) => write!(f, "{:?}", v),
            AttributeValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
            AttributeValue::Object(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for AttributeValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    AttributeValue::$variant(value)
                }
            }
        )+
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Byte,
    char => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    SystemTime => Date,
    Vec<u8> => Blob,
    serde_json::Value => Object,
}

impl From<&str> for AttributeValue {
    #[inline]
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<&[u8]> for AttributeValue {
    #[inline]
    fn from(value: &[u8]) -> Self {
        AttributeValue::Blob(value.to_vec())
    }
}
