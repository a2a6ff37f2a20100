//! Property values.

use std::fmt;

use serde::Serialize;
use serde_json::value::RawValue;

use super::attribute::AttributeType;
use crate::util::{Error, Result};

/// Decoded property value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of integers and numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Retype a slot value for the attribute that references it.
    ///
    /// Values that do not fit the attribute type are returned unchanged.
    pub fn coerce(&self, ty: AttributeType) -> PropertyValue {
        use AttributeType as T;
        match (ty, self) {
            (_, Self::Null) => Self::Null,
            (T::Boolean, Self::Integer(i)) => Self::Boolean(*i != 0),
            (T::Boolean, Self::Number(n)) => Self::Boolean(*n != 0.0),
            (T::Integer | T::DbKey, Self::Number(n)) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                Self::Integer(*n as i64)
            }
            (T::Integer | T::DbKey, Self::Boolean(b)) => Self::Integer(*b as i64),
            (T::Double | T::Float, Self::Integer(i)) => Self::Number(*i as f64),
            (t, Self::Integer(i)) if t.is_string() => Self::String(i.to_string()),
            (t, Self::Number(n)) if t.is_string() => Self::String(n.to_string()),
            (t, Self::Boolean(b)) if t.is_string() => Self::String(b.to_string()),
            (_, v) => v.clone(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Check that a raw slot holds a scalar.
pub(crate) fn check_scalar(index: usize, raw: &RawValue) -> Result<()> {
    match raw.get().trim_start().as_bytes().first() {
        Some(b'[') | Some(b'{') => Err(Error::propdb(format!("value {} is not a scalar", index))),
        Some(_) => Ok(()),
        None => Err(Error::propdb(format!("value {} is empty", index))),
    }
}

/// Decode one raw slot.
pub(crate) fn decode_slot(raw: &RawValue) -> PropertyValue {
    match serde_json::from_str::<serde_json::Value>(raw.get()) {
        Ok(serde_json::Value::Bool(b)) => PropertyValue::Boolean(b),
        Ok(serde_json::Value::Number(n)) => match n.as_i64() {
            Some(i) => PropertyValue::Integer(i),
            None => PropertyValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        },
        Ok(serde_json::Value::String(s)) => PropertyValue::String(s),
        // Containers are rejected when the database is opened.
        _ => PropertyValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> Box<RawValue> {
        RawValue::from_string(s.to_string()).unwrap()
    }

    #[test]
    fn test_decode_slot() {
        assert_eq!(decode_slot(&raw("12.5")), PropertyValue::Number(12.5));
        assert_eq!(decode_slot(&raw("3")), PropertyValue::Integer(3));
        assert_eq!(decode_slot(&raw("\"Wall\"")), PropertyValue::from("Wall"));
        assert_eq!(decode_slot(&raw("true")), PropertyValue::Boolean(true));
        assert_eq!(decode_slot(&raw("null")), PropertyValue::Null);
    }

    #[test]
    fn test_check_scalar() {
        assert!(check_scalar(0, &raw("1")).is_ok());
        assert!(check_scalar(0, &raw("[1]")).is_err());
        assert!(check_scalar(0, &raw(" {\"a\":1}")).is_err());
    }

    #[test]
    fn test_coerce() {
        let one = PropertyValue::Integer(1);
        assert_eq!(one.coerce(AttributeType::Boolean), PropertyValue::Boolean(true));
        assert_eq!(one.coerce(AttributeType::Double), PropertyValue::Number(1.0));
        assert_eq!(one.coerce(AttributeType::String), PropertyValue::from("1"));
        assert_eq!(PropertyValue::Number(4.0).coerce(AttributeType::DbKey), PropertyValue::Integer(4));
        assert_eq!(PropertyValue::Number(4.5).coerce(AttributeType::Integer), PropertyValue::Number(4.5));
        assert_eq!(PropertyValue::from("x").coerce(AttributeType::Boolean), PropertyValue::from("x"));
        assert_eq!(PropertyValue::Null.coerce(AttributeType::String), PropertyValue::Null);
    }
}
