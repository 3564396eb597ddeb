/*!
 * JSON Decomposer
 */

use super::traits::Decomposer;
use crate::core::serde::to_micros;
use crate::monitor::{AttributeHolder, AttributeValue};
use serde_json::Value;

/// Renders attribute values as plain JSON
///
/// Dates become microseconds since the UNIX epoch, blobs become byte arrays
/// and non-finite floats become `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecomposer;

impl Decomposer for JsonDecomposer {
    fn decompose(&self, holder: &AttributeHolder) -> Value {
        match holder.value() {
            AttributeValue::Bool(v) => Value::from(*v),
            AttributeValue::Byte(v) => Value::from(*v),
            AttributeValue::Char(v) => Value::from(v.to_string()),
            AttributeValue::Short(v) => Value::from(*v),
            AttributeValue::Int(v) => Value::from(*v),
            AttributeValue::Long(v) => Value::from(*v),
            AttributeValue::Float(v) => Value::from(f64::from(*v)),
            AttributeValue::Double(v) => Value::from(*v),
            AttributeValue::String(v) => Value::from(v.as_str()),
            AttributeValue::Date(v) => to_micros(*v).map(Value::from).unwrap_or(Value::Null),
            AttributeValue::Blob(v) => Value::from(v.clone()),
            AttributeValue::Object(v) => v.clone(),
        }
    }
}
