//! Comparison operators used in range predicates.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use super::{Direction, SortOrder};

/// A comparison between a field and a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, IntoStaticStr)]
pub enum Operator {
    /// `field = value`
    #[serde(rename = "=")]
    #[strum(serialize = "=")]
    Equal,

    /// `field < value`
    #[serde(rename = "<")]
    #[strum(serialize = "<")]
    LessThan,

    /// `field > value`
    #[serde(rename = ">")]
    #[strum(serialize = ">")]
    GreaterThan,
}

impl Operator {
    /// Resolves the cursor predicate operator for a traversal.
    ///
    /// | order      | direction | operator |
    /// |------------|-----------|----------|
    /// | Ascending  | Next      | `>`      |
    /// | Descending | Next      | `<`      |
    /// | Ascending  | Back      | `<`      |
    /// | Descending | Back      | `>`      |
    pub fn resolve(order: SortOrder, direction: Direction) -> Self {
        match (order, direction) {
            (SortOrder::Ascending, Direction::Next) => Operator::GreaterThan,
            (SortOrder::Descending, Direction::Next) => Operator::LessThan,
            (SortOrder::Ascending, Direction::Back) => Operator::LessThan,
            (SortOrder::Descending, Direction::Back) => Operator::GreaterThan,
        }
    }

    /// Returns the SQL token for this operator.
    #[inline]
    pub fn as_sql(self) -> &'static str {
        self.into()
    }

    /// Evaluates the operator against an ordering of `field` relative to `value`.
    #[inline]
    pub fn matches(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;

        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::GreaterThan => ordering == Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    #[test]
    fn ascending_next_is_greater_than() {
        let operator = Operator::resolve(SortOrder::Ascending, Direction::Next);
        assert_eq!(operator, Operator::GreaterThan);
    }

    #[test]
    fn descending_next_is_less_than() {
        let operator = Operator::resolve(SortOrder::Descending, Direction::Next);
        assert_eq!(operator, Operator::LessThan);
    }

    #[test]
    fn ascending_back_is_less_than() {
        let operator = Operator::resolve(SortOrder::Ascending, Direction::Back);
        assert_eq!(operator, Operator::LessThan);
    }

    #[test]
    fn descending_back_is_greater_than() {
        let operator = Operator::resolve(SortOrder::Descending, Direction::Back);
        assert_eq!(operator, Operator::GreaterThan);
    }

    #[test]
    fn probe_operator_inverts_the_traversal() {
        // The boundary probe looks the opposite way from the fetch.
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            for direction in [Direction::Next, Direction::Back] {
                let fetch = Operator::resolve(order, direction);
                let probe = Operator::resolve(order, direction.opposite());
                assert_ne!(fetch, probe);
            }
        }
    }

    #[test]
    fn sql_tokens() {
        assert_eq!(Operator::Equal.as_sql(), "=");
        assert_eq!(Operator::LessThan.as_sql(), "<");
        assert_eq!(Operator::GreaterThan.as_sql(), ">");
    }

    #[test]
    fn matches_orderings() {
        assert!(Operator::LessThan.matches(Ordering::Less));
        assert!(!Operator::LessThan.matches(Ordering::Equal));
        assert!(Operator::GreaterThan.matches(Ordering::Greater));
        assert!(Operator::Equal.matches(Ordering::Equal));
    }
}
