//! Typed cursors and their integer transport encoding.
//!
//! On the wire a cursor is a bare `i64`: the identifier itself in
//! [`CursorMode::Identifier`], or nanoseconds since the Unix epoch in
//! [`CursorMode::Time`]. Inside the crate a cursor is always typed, so mode
//! mismatches are caught once instead of at every use site.

use std::fmt;

use jiff::Timestamp;

use super::CursorMode;
use crate::query::Value;
use crate::{Error, Result};

/// A position in an ordered collection, derived from a row's sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Native identifier of the boundary row.
    Id(i64),
    /// Timestamp of the boundary row.
    Time(Timestamp),
}

impl Cursor {
    /// Decodes a raw transport value according to `mode`.
    ///
    /// Identifiers pass through unchanged; timestamps are read as nanoseconds
    /// since the Unix epoch (UTC).
    pub fn decode(raw: i64, mode: CursorMode) -> Result<Self> {
        match mode {
            CursorMode::Identifier => Ok(Cursor::Id(raw)),
            CursorMode::Time => Timestamp::from_nanosecond(i128::from(raw))
                .map(Cursor::Time)
                .map_err(|e| Error::CursorOutOfRange(e.to_string().into())),
        }
    }

    /// Decodes an optional raw value; absent input stays absent.
    pub fn decode_opt(raw: Option<i64>, mode: CursorMode) -> Result<Option<Self>> {
        raw.map(|raw| Self::decode(raw, mode)).transpose()
    }

    /// Encodes the cursor into its raw transport value.
    ///
    /// Fails for timestamps whose nanosecond offset does not fit in an `i64`
    /// (before 1677 or after 2262).
    pub fn encode(&self) -> Result<i64> {
        match self {
            Cursor::Id(id) => Ok(*id),
            Cursor::Time(timestamp) => {
                i64::try_from(timestamp.as_nanosecond()).map_err(|_| {
                    Error::CursorOutOfRange(
                        format!("{timestamp} cannot be encoded as i64 nanoseconds").into(),
                    )
                })
            }
        }
    }

    /// Returns the mode this cursor belongs to.
    #[inline]
    pub fn mode(&self) -> CursorMode {
        match self {
            Cursor::Id(_) => CursorMode::Identifier,
            Cursor::Time(_) => CursorMode::Time,
        }
    }

    /// Fails with [`Error::TypeMismatch`] unless this cursor belongs to `mode`.
    pub fn expect_mode(&self, mode: CursorMode) -> Result<()> {
        if self.mode() == mode {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                expected: mode,
                found: self.mode(),
            })
        }
    }

    /// Converts the cursor into a bindable query value.
    #[inline]
    pub fn into_value(self) -> Value {
        match self {
            Cursor::Id(id) => Value::BigInt(id),
            Cursor::Time(timestamp) => Value::Timestamp(timestamp),
        }
    }
}

impl From<Cursor> for Value {
    fn from(cursor: Cursor) -> Self {
        cursor.into_value()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Id(id) => write!(f, "{id}"),
            Cursor::Time(timestamp) => write!(f, "{timestamp}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_passes_through() {
        let cursor = Cursor::decode(42, CursorMode::Identifier).unwrap();
        assert_eq!(cursor, Cursor::Id(42));
        assert_eq!(cursor.encode().unwrap(), 42);
    }

    #[test]
    fn time_roundtrip_keeps_nanoseconds() {
        let raw = 1_700_000_000_123_456_789;
        let cursor = Cursor::decode(raw, CursorMode::Time).unwrap();
        let Cursor::Time(timestamp) = cursor else {
            panic!("expected a time cursor");
        };

        assert_eq!(timestamp.as_second(), 1_700_000_000);
        assert_eq!(timestamp.subsec_nanosecond(), 123_456_789);
        assert_eq!(cursor.encode().unwrap(), raw);
    }

    #[test]
    fn negative_time_roundtrip() {
        let raw = -1_500_000_001;
        let cursor = Cursor::decode(raw, CursorMode::Time).unwrap();
        assert_eq!(cursor.encode().unwrap(), raw);
    }

    #[test]
    fn timestamp_encode_then_decode() {
        let timestamp: Timestamp = "2024-03-09T12:34:56.987654321Z".parse().unwrap();
        let raw = Cursor::Time(timestamp).encode().unwrap();
        assert_eq!(
            Cursor::decode(raw, CursorMode::Time).unwrap(),
            Cursor::Time(timestamp)
        );
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(Cursor::decode_opt(None, CursorMode::Time).unwrap(), None);
        assert_eq!(
            Cursor::decode_opt(Some(7), CursorMode::Identifier).unwrap(),
            Some(Cursor::Id(7))
        );
    }

    #[test]
    fn out_of_range_timestamp_fails_to_encode() {
        let cursor = Cursor::Time(Timestamp::MAX);
        assert!(matches!(cursor.encode(), Err(Error::CursorOutOfRange(_))));
    }

    #[test]
    fn mode_mismatch_is_reported() {
        let error = Cursor::Id(1).expect_mode(CursorMode::Time).unwrap_err();
        assert!(matches!(
            error,
            Error::TypeMismatch {
                expected: CursorMode::Time,
                found: CursorMode::Identifier,
            }
        ));
        assert!(Cursor::Id(1).expect_mode(CursorMode::Identifier).is_ok());
    }
}
