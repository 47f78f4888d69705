use std::cmp::Ordering;
use std::fmt;

use jiff::Timestamp;
use uuid::Uuid;

/// A value bound into a range predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// 64-bit integer (`BIGINT`).
    BigInt(i64),
    /// UTC timestamp (`TIMESTAMPTZ`).
    Timestamp(Timestamp),
    /// Text (`TEXT`).
    Text(String),
    /// UUID (`UUID`).
    Uuid(Uuid),
}

impl Value {
    /// Compares two values of the same type.
    ///
    /// Returns `None` when the values have different types.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns the name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::BigInt(_) => "bigint",
            Value::Timestamp(_) => "timestamptz",
            Value::Text(_) => "text",
            Value::Uuid(_) => "uuid",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v:?}"),
            Value::Uuid(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::BigInt(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}
