use std::borrow::Cow;

use super::Value;
use crate::types::{FieldName, Operator, SortOrder};

/// A single `field <operator> value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Column the condition applies to.
    pub field: FieldName,
    /// Comparison applied between the column and the value.
    pub operator: Operator,
    /// Bound value.
    pub value: Value,
}

impl Predicate {
    /// Creates a new predicate.
    pub fn new(field: FieldName, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}

/// An ordered, limited, predicate-filtered query over one relation.
///
/// Every builder method consumes the query and returns the refined one, so a
/// base query can be cloned and specialised for the page fetch and for the
/// boundary probe independently.
///
/// ## Example
///
/// ```rust
/// use keyset_core::{FieldName, Operator, RangeQuery, SortOrder};
///
/// let created_at = FieldName::new("created_at")?;
/// let query = RangeQuery::new()
///     .with_table("events")
///     .with_predicate(FieldName::new("owner_id")?, Operator::Equal, 7_i64)
///     .with_order(created_at, SortOrder::Descending)
///     .with_limit(21);
///
/// assert_eq!(query.limit(), Some(21));
/// # Ok::<(), keyset_core::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "range queries do nothing unless executed"]
pub struct RangeQuery {
    table: Option<Cow<'static, str>>,
    predicates: Vec<Predicate>,
    order: Option<(FieldName, SortOrder)>,
    limit: Option<i64>,
}

impl RangeQuery {
    /// Creates an unrestricted query over the executor's default relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes the query to the given relation.
    pub fn with_table(mut self, table: impl Into<Cow<'static, str>>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Adds a condition; all conditions are combined with `AND`.
    pub fn with_predicate(
        mut self,
        field: FieldName,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.predicates.push(Predicate::new(field, operator, value));
        self
    }

    /// Orders results by `field`, replacing any previous ordering.
    pub fn with_order(mut self, field: FieldName, order: SortOrder) -> Self {
        self.order = Some((field, order));
        self
    }

    /// Limits the number of rows returned, replacing any previous limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    /// Removes the row limit.
    pub fn without_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Returns the relation this query is scoped to, if any.
    #[inline]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns the conditions of this query.
    #[inline]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns the ordering of this query, if any.
    #[inline]
    pub fn order(&self) -> Option<(&FieldName, SortOrder)> {
        self.order.as_ref().map(|(field, order)| (field, *order))
    }

    /// Returns the row limit of this query, if any.
    #[inline]
    pub fn limit(&self) -> Option<i64> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> FieldName {
        FieldName::new(name).unwrap()
    }

    #[test]
    fn builder_composes() {
        let query = RangeQuery::new()
            .with_table("items")
            .with_predicate(field("id"), Operator::LessThan, 8_i64)
            .with_order(field("id"), SortOrder::Descending)
            .with_limit(4);

        assert_eq!(query.table(), Some("items"));
        assert_eq!(query.predicates().len(), 1);
        assert_eq!(query.predicates()[0].value, Value::BigInt(8));
        assert_eq!(query.order(), Some((&field("id"), SortOrder::Descending)));
        assert_eq!(query.limit(), Some(4));
    }

    #[test]
    fn refinements_leave_the_base_untouched() {
        let base = RangeQuery::new().with_predicate(field("owner"), Operator::Equal, "a");
        let refined = base.clone().with_limit(1);

        assert_eq!(base.limit(), None);
        assert_eq!(refined.limit(), Some(1));
        assert_eq!(refined.predicates(), base.predicates());
    }

    #[test]
    fn later_order_and_limit_replace_earlier_ones() {
        let query = RangeQuery::new()
            .with_order(field("id"), SortOrder::Ascending)
            .with_order(field("created_at"), SortOrder::Descending)
            .with_limit(10)
            .with_limit(-3);

        assert_eq!(
            query.order(),
            Some((&field("created_at"), SortOrder::Descending))
        );
        assert_eq!(query.limit(), Some(0));
        assert_eq!(query.without_limit().limit(), None);
    }
}
