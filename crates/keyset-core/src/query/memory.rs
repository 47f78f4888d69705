//! In-memory range query executor.
//!
//! [`MemoryStore`] evaluates [`RangeQuery`]s over a `Vec` with the same
//! semantics a SQL store applies: strict comparisons, stable ordering, limits
//! and limited counts. Every executed query is recorded so tests can assert on
//! what the paginator asked for.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::mem;

use super::{Predicate, RangeQuery, RangeQueryExecutor, Value};
use crate::TRACING_TARGET_QUERY;
use crate::types::SortOrder;

type Accessor<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;

/// Kind of operation a recorded query was executed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Row fetch.
    Fetch,
    /// Row count.
    Count,
}

/// A query the store has executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedQuery {
    /// How the query was executed.
    pub kind: QueryKind,
    /// The query itself.
    pub query: RangeQuery,
}

/// Errors raised by [`MemoryStore`].
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    /// The query references a field without a registered accessor.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The query is scoped to a relation the store does not hold.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A field was compared against a value of a different type.
    #[error("Cannot compare {field} ({found}) with {expected}")]
    Incomparable {
        /// Field being compared.
        field: String,
        /// Type of the bound value.
        expected: &'static str,
        /// Type of the row value.
        found: &'static str,
    },

    /// A failure injected through [`MemoryStore::fail_fetch`] or
    /// [`MemoryStore::fail_count`].
    #[error("Injected {0:?} failure")]
    Injected(QueryKind),
}

/// A [`RangeQueryExecutor`] over rows held in memory.
///
/// Fields are resolved through accessors registered with
/// [`MemoryStore::with_field`].
pub struct MemoryStore<R> {
    table: Cow<'static, str>,
    rows: Vec<R>,
    fields: HashMap<String, Accessor<R>>,
    executed: Vec<ExecutedQuery>,
    fail_fetch: bool,
    fail_count: bool,
}

impl<R> MemoryStore<R> {
    /// Creates a store for `table` holding `rows` in insertion order.
    pub fn new(table: impl Into<Cow<'static, str>>, rows: Vec<R>) -> Self {
        Self {
            table: table.into(),
            rows,
            fields: HashMap::new(),
            executed: Vec::new(),
            fail_fetch: false,
            fail_count: false,
        }
    }

    /// Registers an accessor for a named field.
    pub fn with_field<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.fields.insert(name.into(), Box::new(accessor));
        self
    }

    /// Makes every subsequent fetch fail.
    pub fn fail_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Makes every subsequent count fail.
    pub fn fail_count(mut self) -> Self {
        self.fail_count = true;
        self
    }

    /// Appends a row.
    pub fn insert(&mut self, row: R) {
        self.rows.push(row);
    }

    /// Returns the number of rows held.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the store holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns every query executed so far, oldest first.
    #[inline]
    pub fn executed(&self) -> &[ExecutedQuery] {
        &self.executed
    }

    /// Returns and clears the executed query log.
    pub fn take_executed(&mut self) -> Vec<ExecutedQuery> {
        mem::take(&mut self.executed)
    }

    fn accessor(&self, field: &str) -> Result<&Accessor<R>, MemoryStoreError> {
        self.fields
            .get(field)
            .ok_or_else(|| MemoryStoreError::UnknownField(field.to_owned()))
    }

    fn check_table(&self, query: &RangeQuery) -> Result<(), MemoryStoreError> {
        match query.table() {
            Some(table) if table != self.table => {
                Err(MemoryStoreError::UnknownTable(table.to_owned()))
            }
            _ => Ok(()),
        }
    }

    fn matches(&self, row: &R, predicate: &Predicate) -> Result<bool, MemoryStoreError> {
        let accessor = self.accessor(predicate.field.as_str())?;
        let value = accessor(row);
        let ordering = value.compare(&predicate.value).ok_or_else(|| {
            MemoryStoreError::Incomparable {
                field: predicate.field.to_string(),
                expected: predicate.value.type_name(),
                found: value.type_name(),
            }
        })?;

        Ok(predicate.operator.matches(ordering))
    }

    /// Returns the rows satisfying every predicate, in insertion order.
    fn filter(&self, query: &RangeQuery) -> Result<Vec<&R>, MemoryStoreError> {
        self.check_table(query)?;

        let mut selected = Vec::new();
        'rows: for row in &self.rows {
            for predicate in query.predicates() {
                if !self.matches(row, predicate)? {
                    continue 'rows;
                }
            }
            selected.push(row);
        }

        Ok(selected)
    }

    fn sort<'a>(
        &self,
        rows: Vec<&'a R>,
        query: &RangeQuery,
    ) -> Result<Vec<&'a R>, MemoryStoreError> {
        let Some((field, order)) = query.order() else {
            return Ok(rows);
        };

        let accessor = self.accessor(field.as_str())?;
        let mut keyed: Vec<(Value, &R)> = rows
            .into_iter()
            .map(|row| (accessor(row), row))
            .collect();

        if let Some((first, _)) = keyed.first()
            && let Some((other, _)) = keyed
                .iter()
                .find(|(key, _)| mem::discriminant(key) != mem::discriminant(first))
        {
            return Err(MemoryStoreError::Incomparable {
                field: field.to_string(),
                expected: first.type_name(),
                found: other.type_name(),
            });
        }

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = a.compare(b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    fn record(&mut self, kind: QueryKind, query: &RangeQuery) {
        self.executed.push(ExecutedQuery {
            kind,
            query: query.clone(),
        });
    }
}

impl<R> RangeQueryExecutor<R> for MemoryStore<R>
where
    R: Clone + Send + Sync,
{
    type Error = MemoryStoreError;

    async fn fetch(&mut self, query: &RangeQuery) -> Result<Vec<R>, Self::Error> {
        self.record(QueryKind::Fetch, query);

        if self.fail_fetch {
            return Err(MemoryStoreError::Injected(QueryKind::Fetch));
        }

        let selected = self.filter(query)?;
        let mut sorted = self.sort(selected, query)?;

        if let Some(limit) = query.limit() {
            sorted.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            table = %self.table,
            rows = sorted.len(),
            "Fetched rows from memory store"
        );

        Ok(sorted.into_iter().cloned().collect())
    }

    async fn count(&mut self, query: &RangeQuery) -> Result<i64, Self::Error> {
        self.record(QueryKind::Count, query);

        if self.fail_count {
            return Err(MemoryStoreError::Injected(QueryKind::Count));
        }

        let mut count = self.filter(query)?.len() as i64;
        if let Some(limit) = query.limit() {
            count = count.min(limit);
        }

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            table = %self.table,
            count,
            "Counted rows in memory store"
        );

        Ok(count)
    }

    fn table_name_of(&self, _row: &R) -> Cow<'static, str> {
        self.table.clone()
    }
}

impl<R> fmt::Debug for MemoryStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.fields.keys().collect();
        fields.sort();

        f.debug_struct("MemoryStore")
            .field("table", &self.table)
            .field("rows", &self.rows.len())
            .field("fields", &fields)
            .field("executed", &self.executed.len())
            .finish()
    }
}
