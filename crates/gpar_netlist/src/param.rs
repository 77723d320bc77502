//! Typed parameter and attribute values.
//!
//! The front end writes integers as binary strings, strings with a trailing
//! space when they could be mistaken for binary, and reals as decimal text.
//! [`ParamValue::from_json`] undoes those conventions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A cell parameter or attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// An integer, from a JSON number or a binary string.
    Int(i64),
    /// A real number, from a decimal string or a fractional JSON number.
    Real(f64),
    /// Any other text, with quotes and padding removed.
    Text(String),
}

impl ParamValue {
    /// Converts a JSON value, or `None` for arrays, objects and null.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ParamValue::Int(i64::from(*b))),
            Value::Number(n) => n
                .as_i64()
                .map(ParamValue::Int)
                .or_else(|| n.as_f64().map(ParamValue::Real)),
            Value::String(s) => Some(Self::parse(s)),
            Value::Array(_) | Value::Object(_) | Value::Null => None,
        }
    }

    /// Parses a string parameter as written in the netlist.
    pub fn parse(raw: &str) -> Self {
        // A trailing space marks a string that must not be read as binary.
        if raw.ends_with(' ') {
            return ParamValue::Text(strip_quotes(raw.trim_end()).to_string());
        }
        if let Some(value) = parse_binary(raw) {
            return ParamValue::Int(value);
        }
        if looks_decimal(raw) {
            if let Ok(value) = raw.parse::<f64>() {
                return ParamValue::Real(value);
            }
        }
        ParamValue::Text(strip_quotes(raw.trim()).to_string())
    }

    /// Returns the value as an integer; reals qualify only when integral.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Real(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    /// Returns the value as a real number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Real(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// Returns the text of a string parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a boolean flag (`0`/`1`).
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_int() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Real(v) => write!(f, "{v}"),
            ParamValue::Text(s) => write!(f, "{s}"),
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

/// Parses an all-`01xz` string MSB first; `x`/`z` read as zero.
fn parse_binary(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 64 || !s.chars().all(|c| matches!(c, '0' | '1' | 'x' | 'z')) {
        return None;
    }
    let mut value: u64 = 0;
    for c in s.chars() {
        value = (value << 1) | u64::from(c == '1');
    }
    Some(value as i64)
}

fn looks_decimal(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && s.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binary_strings_are_integers() {
        assert_eq!(ParamValue::parse("00000000000000000000000000001010"), ParamValue::Int(10));
        assert_eq!(ParamValue::parse("1"), ParamValue::Int(1));
        assert_eq!(ParamValue::parse("0x1"), ParamValue::Text("0x1".into()));
    }

    #[test]
    fn undefined_bits_read_as_zero() {
        assert_eq!(ParamValue::parse("1x1z"), ParamValue::Int(0b1010));
    }

    #[test]
    fn decimal_strings_are_reals() {
        assert_eq!(ParamValue::parse("0.25"), ParamValue::Real(0.25));
        assert_eq!(ParamValue::parse("16"), ParamValue::Real(16.0));
        assert_eq!(ParamValue::parse("16").as_int(), Some(16));
    }

    #[test]
    fn padded_strings_are_text() {
        assert_eq!(ParamValue::parse("PULL_10K "), ParamValue::Text("PULL_10K".into()));
        assert_eq!(ParamValue::parse("10 "), ParamValue::Text("10".into()));
        assert_eq!(ParamValue::parse("\"SINGLE\""), ParamValue::Text("SINGLE".into()));
        assert_eq!(ParamValue::parse("DIFF"), ParamValue::Text("DIFF".into()));
    }

    #[test]
    fn json_numbers() {
        assert_eq!(ParamValue::from_json(&json!(4)), Some(ParamValue::Int(4)));
        assert_eq!(ParamValue::from_json(&json!(0.5)), Some(ParamValue::Real(0.5)));
        assert_eq!(ParamValue::from_json(&json!(true)), Some(ParamValue::Int(1)));
        assert_eq!(ParamValue::from_json(&json!([1, 2])), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(ParamValue::Int(1).as_bool(), Some(true));
        assert_eq!(ParamValue::Int(2).as_bool(), None);
        assert_eq!(ParamValue::Real(2.5).as_int(), None);
        assert_eq!(ParamValue::Int(3).as_real(), Some(3.0));
        assert_eq!(ParamValue::Text("X".into()).as_real(), None);
        assert_eq!(ParamValue::Text("X".into()).as_str(), Some("X"));
    }
}
