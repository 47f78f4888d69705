//! Cursor mode enumeration.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Defines how raw cursor values are typed.
///
/// The mode is fixed when a paginator is built; every cursor it accepts or
/// produces must carry the same mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum CursorMode {
    /// Cursors are native integer identifiers.
    #[serde(rename = "id")]
    #[strum(serialize = "id")]
    #[default]
    Identifier,

    /// Cursors are UTC timestamps carried as nanoseconds since the epoch.
    #[serde(rename = "time")]
    #[strum(serialize = "time")]
    Time,
}

impl CursorMode {
    /// Returns whether cursors in this mode are timestamps.
    #[inline]
    pub fn is_time(self) -> bool {
        matches!(self, CursorMode::Time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transport_names() {
        assert_eq!("id".parse::<CursorMode>().unwrap(), CursorMode::Identifier);
        assert_eq!("time".parse::<CursorMode>().unwrap(), CursorMode::Time);
        assert!("unknown".parse::<CursorMode>().is_err());
    }

    #[test]
    fn rejects_unknown_mode_on_deserialize() {
        let mode: CursorMode = serde_json::from_str("\"time\"").unwrap();
        assert_eq!(mode, CursorMode::Time);
        assert!(serde_json::from_str::<CursorMode>("\"Unknown\"").is_err());
    }
}
