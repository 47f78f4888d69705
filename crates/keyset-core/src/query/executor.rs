use std::borrow::Cow;
use std::future::Future;

use super::RangeQuery;

/// A store able to run [`RangeQuery`]s for rows of type `R`.
///
/// Implementations are external collaborators of the paginator: they own the
/// connection, the transaction and any timeout policy. Both operations must be
/// read-only.
pub trait RangeQueryExecutor<R> {
    /// Error raised by the underlying store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the query and returns its rows in query order.
    fn fetch(
        &mut self,
        query: &RangeQuery,
    ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send;

    /// Runs the query as a row count, honouring its predicates and limit.
    fn count(&mut self, query: &RangeQuery)
    -> impl Future<Output = Result<i64, Self::Error>> + Send;

    /// Resolves the relation a row was read from.
    fn table_name_of(&self, row: &R) -> Cow<'static, str>;
}
