//! DynamoDB attribute conversion functions.
//!
//! Pure functions for moving between dynakit scalars, untyped JSON values
//! and `AttributeValue`. These are testable in isolation without DynamoDB
//! access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use dynakit_core::ScalarValue;
use serde_json::Value;

/// Convert a scalar to its tagged wire value for items and keys.
///
/// Floats are rounded to the fixed item precision.
pub fn scalar_to_attribute(value: &ScalarValue) -> AttributeValue {
    match value {
        ScalarValue::String(s) => AttributeValue::S(s.clone()),
        ScalarValue::Bool(b) => AttributeValue::Bool(*b),
        number => AttributeValue::N(number.number_string().unwrap_or_default()),
    }
}

/// Convert an update expression value to its wire value.
///
/// Numbers keep full precision.
pub fn update_value_to_attribute(value: &ScalarValue) -> AttributeValue {
    match value {
        ScalarValue::String(s) => AttributeValue::S(s.clone()),
        ScalarValue::Bool(b) => AttributeValue::Bool(*b),
        number => AttributeValue::N(number.exact_number_string().unwrap_or_default()),
    }
}

/// Convert an untyped value, returning `None` for unsupported types.
pub fn json_to_attribute(value: &Value) -> Option<AttributeValue> {
    ScalarValue::from_json(value).map(|scalar| scalar_to_attribute(&scalar))
}

/// Convert a wire value back to JSON.
///
/// Numbers that parse as `i64` come back as integers, other numbers as
/// floats. Sets, lists, maps and binaries have no untyped form here.
pub fn attribute_to_json(value: &AttributeValue) -> Option<Value> {
    match value {
        AttributeValue::S(s) => Some(Value::String(s.clone())),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Some(Value::Bool(*b)),
        AttributeValue::Null(_) => Some(Value::Null),
        _ => None,
    }
}

/// Convert an update expression's value placeholders into wire values.
pub fn update_values_to_attributes<'a>(
    values: impl IntoIterator<Item = (&'a String, &'a ScalarValue)>,
) -> HashMap<String, AttributeValue> {
    values
        .into_iter()
        .map(|(k, v)| (k.clone(), update_value_to_attribute(v)))
        .collect()
}

fn number_to_json(n: &str) -> Option<Value> {
    if let Ok(i) = n.parse::<i64>() {
        return Some(Value::from(i));
    }
    n.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
