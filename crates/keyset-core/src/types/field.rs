//! Validated column identifiers.

use std::fmt;

use derive_more::{AsRef, Deref};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Maximum identifier length accepted by PostgreSQL without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// The name of a column a range query orders or filters by.
///
/// Names are restricted to plain identifiers (`[A-Za-z_][A-Za-z0-9_]*`) so
/// executors can quote them without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, AsRef, Serialize, Deserialize)]
#[as_ref(forward)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Validates and wraps a column name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::Config("field name cannot be empty".into()));
        }

        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(Error::Config(
                format!("field name `{name}` exceeds {MAX_IDENTIFIER_LEN} bytes").into(),
            ));
        }

        let mut chars = name.chars();
        let valid_head = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_head || !valid_tail {
            return Err(Error::Config(
                format!("field name `{name}` is not a plain identifier").into(),
            ));
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FieldName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FieldName> for String {
    fn from(field: FieldName) -> Self {
        field.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert_eq!(FieldName::new("id").unwrap().as_str(), "id");
        assert!(FieldName::new("created_at").is_ok());
        assert!(FieldName::new("_private2").is_ok());
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(FieldName::new("").is_err());
        assert!(FieldName::new("1id").is_err());
        assert!(FieldName::new("id; DROP TABLE items").is_err());
        assert!(FieldName::new("\"id\"").is_err());
        assert!(FieldName::new("a".repeat(64)).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let field: FieldName = serde_json::from_str("\"created_at\"").unwrap();
        assert_eq!(&*field, "created_at");
        assert!(serde_json::from_str::<FieldName>("\"created at\"").is_err());
    }
}
