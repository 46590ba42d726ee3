//! Scalar parsers with Go `strconv` compatible inputs.

/// Parses a boolean the way `strconv.ParseBool` does.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parses a base-10 integer that must fit in 32 bits.
pub fn parse_int32(value: &str) -> Option<i32> {
    value.parse().ok()
}

pub fn parse_int64(value: &str) -> Option<i64> {
    value.parse().ok()
}

/// Parses a finite float. NaN and infinities have no DynamoDB encoding.
pub fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|f| f.is_finite())
}
