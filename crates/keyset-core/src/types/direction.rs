//! Sort order and traversal direction.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The caller-visible sort order of a paginated collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum SortOrder {
    /// Smallest sort key first.
    #[serde(rename = "asc")]
    #[strum(serialize = "asc")]
    Ascending,

    /// Largest sort key first.
    #[serde(rename = "desc")]
    #[strum(serialize = "desc")]
    #[default]
    Descending,
}

impl SortOrder {
    /// Returns the opposite order.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Returns the order the store must be queried in for the given direction.
    ///
    /// Backward traversal walks the store in reverse; the fetched rows are
    /// reversed again before they reach the caller.
    #[inline]
    pub fn effective(self, direction: Direction) -> Self {
        match direction {
            Direction::Next => self,
            Direction::Back => self.reverse(),
        }
    }

    /// Returns the SQL keyword for this order.
    #[inline]
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Which way to traverse relative to the current cursor.
///
/// Orthogonal to [`SortOrder`]: `Next` always advances in the caller's order,
/// `Back` always retreats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum Direction {
    /// Advance to the page after the cursor.
    #[serde(rename = "next")]
    #[strum(serialize = "next")]
    #[default]
    Next,

    /// Retreat to the page before the cursor.
    #[serde(rename = "back")]
    #[strum(serialize = "back")]
    Back,
}

impl Direction {
    /// Returns the opposite traversal direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Next => Direction::Back,
            Direction::Back => Direction::Next,
        }
    }

    /// Returns whether this is backward traversal.
    #[inline]
    pub fn is_back(self) -> bool {
        matches!(self, Direction::Back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_order_table() {
        use Direction::*;
        use SortOrder::*;

        assert_eq!(Ascending.effective(Next), Ascending);
        assert_eq!(Descending.effective(Next), Descending);
        assert_eq!(Ascending.effective(Back), Descending);
        assert_eq!(Descending.effective(Back), Ascending);
    }

    #[test]
    fn opposite_is_involution() {
        assert_eq!(Direction::Next.opposite(), Direction::Back);
        assert_eq!(Direction::Back.opposite().opposite(), Direction::Back);
        assert_eq!(SortOrder::Ascending.reverse().reverse(), SortOrder::Ascending);
    }

    #[test]
    fn sql_and_transport_names() {
        assert_eq!(SortOrder::Ascending.as_sql(), "ASC");
        assert_eq!(SortOrder::Descending.as_sql(), "DESC");
        assert_eq!(SortOrder::Ascending.to_string(), "asc");
        assert_eq!("back".parse::<Direction>().unwrap(), Direction::Back);
        assert!("sideways".parse::<Direction>().is_err());
        assert!(serde_json::from_str::<SortOrder>("\"ASC\"").is_err());
    }
}
