use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of fractional digits written for floating point numbers.
pub const FLOAT_PRECISION: usize = 4;

/// A scalar attribute value that can be sent to DynamoDB.
///
/// Only strings and numbers come out of untyped attribute maps for puts and
/// keys. Update expressions also carry `Bool`, from flag attributes or from
/// the parameter binder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ScalarValue {
    /// Converts an untyped JSON value into a scalar.
    ///
    /// Returns `None` for booleans, nulls, arrays and objects. Callers treat
    /// `None` as "leave this attribute out", never as an error.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            _ => None,
        }
    }

    /// Like [`from_json`](Self::from_json) but also keeps booleans.
    ///
    /// Used for update expressions, which set every given flag.
    pub fn from_update_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            other => Self::from_json(other),
        }
    }

    /// Returns the DynamoDB number string for numeric values.
    ///
    /// Floats are written with [`FLOAT_PRECISION`] fractional digits. This is
    /// the encoding for stored items and keys.
    pub fn number_string(&self) -> Option<String> {
        match self {
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            _ => None,
        }
    }

    /// Returns the number string without rounding, e.g. `0.00001` stays
    /// `"0.00001"`. Update expression values use this form.
    pub fn exact_number_string(&self) -> Option<String> {
        match self {
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }

    /// Returns true when the value can be written as a DynamoDB number.
    ///
    /// `NaN` and infinities have no number form.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Returns true when this value is sent as a DynamoDB number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

/// Formats a float with fixed precision, e.g. `3.14159` -> `"3.1416"`.
pub fn format_float(value: f64) -> String {
    format!("{:.*}", FLOAT_PRECISION, value)
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{}", format_float(*v)),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for ScalarValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
