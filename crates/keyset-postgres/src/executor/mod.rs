//! [`RangeQueryExecutor`] implementations backed by PostgreSQL.
//!
//! [`RangeQueryExecutor`]: keyset_core::RangeQueryExecutor

mod sql;

use std::borrow::Cow;
use std::fmt;

use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::sql_types::BigInt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use keyset_core::{RangeQuery, RangeQueryExecutor};
pub use sql::{SqlStatement, render_count, render_select};

use crate::{PgConn, PgError, PgResult, TRACING_TARGET_QUERY};

/// A row type that can be paginated straight from a PostgreSQL relation.
///
/// Rows are loaded with `SELECT *`, so the [`QueryableByName`] fields must
/// name columns of [`TABLE_NAME`](PgPageRow::TABLE_NAME).
pub trait PgPageRow: QueryableByName<Pg> + Send + 'static {
    /// Relation the rows are read from, optionally schema-qualified.
    const TABLE_NAME: &'static str;
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Range query executor over a borrowed connection.
///
/// Use it to paginate on a connection that is already checked out, for
/// example inside a transaction; [`PgConn`] wraps one of these per call.
pub struct PgExecutor<'c> {
    conn: &'c mut AsyncPgConnection,
}

impl<'c> PgExecutor<'c> {
    /// Borrows `conn` for the duration of the executor.
    pub fn new(conn: &'c mut AsyncPgConnection) -> Self {
        Self { conn }
    }
}

impl fmt::Debug for PgExecutor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgExecutor").finish_non_exhaustive()
    }
}

impl<R: PgPageRow> RangeQueryExecutor<R> for PgExecutor<'_> {
    type Error = PgError;

    async fn fetch(&mut self, query: &RangeQuery) -> PgResult<Vec<R>> {
        let statement = render_select(query, R::TABLE_NAME);
        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            sql = %statement,
            binds = statement.binds().len(),
            "Fetching rows"
        );

        let rows: Vec<R> = statement
            .into_query()
            .load(&mut *self.conn)
            .await
            .inspect_err(|error| {
                tracing::error!(target: TRACING_TARGET_QUERY, error = %error, "Row fetch failed");
            })?;

        tracing::debug!(target: TRACING_TARGET_QUERY, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    async fn count(&mut self, query: &RangeQuery) -> PgResult<i64> {
        let statement = render_count(query, R::TABLE_NAME);
        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            sql = %statement,
            binds = statement.binds().len(),
            "Counting rows"
        );

        let row: CountRow = statement
            .into_query()
            .get_result(&mut *self.conn)
            .await
            .inspect_err(|error| {
                tracing::error!(target: TRACING_TARGET_QUERY, error = %error, "Row count failed");
            })?;

        Ok(row.count)
    }

    fn table_name_of(&self, _row: &R) -> Cow<'static, str> {
        Cow::Borrowed(R::TABLE_NAME)
    }
}

impl<R: PgPageRow> RangeQueryExecutor<R> for PgConn {
    type Error = PgError;

    async fn fetch(&mut self, query: &RangeQuery) -> PgResult<Vec<R>> {
        RangeQueryExecutor::<R>::fetch(&mut PgExecutor::new(self.as_connection_mut()), query).await
    }

    async fn count(&mut self, query: &RangeQuery) -> PgResult<i64> {
        RangeQueryExecutor::<R>::count(&mut PgExecutor::new(self.as_connection_mut()), query).await
    }

    fn table_name_of(&self, _row: &R) -> Cow<'static, str> {
        Cow::Borrowed(R::TABLE_NAME)
    }
}
