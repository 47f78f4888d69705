//! Turns an overfetched result set into a page with neighbour cursors.

use super::{Page, PageCursors, Paginator};
use crate::query::RangeQueryExecutor;
use crate::types::Cursor;
use crate::{Error, Result, TRACING_TARGET_PAGINATOR};

impl Paginator {
    /// Assembles a page from rows fetched with [`Paginator::page_query`].
    ///
    /// Rows arrive in the effective order with at most `limit + 1` entries:
    ///
    /// 1. An extra row means a further page exists in the traversal
    ///    direction. It is dropped and the new last row becomes the next
    ///    cursor.
    /// 2. The first row is the boundary towards the caller's start. A limited
    ///    count on the other side of it decides the previous cursor. Skipped
    ///    for an empty result.
    /// 3. Backward traversal reverses the rows into the caller's order and
    ///    swaps the two cursors.
    pub(super) async fn assemble<R, E, F>(
        &self,
        mut rows: Vec<R>,
        executor: &mut E,
        cursor_of: &F,
    ) -> Result<Page<R>>
    where
        E: RangeQueryExecutor<R>,
        F: Fn(&R) -> Cursor,
    {
        let limit = self.limit as usize;
        let mut cursors = PageCursors::default();

        if rows.len() > limit {
            rows.truncate(limit);
            if let Some(last) = rows.last() {
                cursors.next_cursor = Some(self.encode(cursor_of(last))?);
            }

            tracing::trace!(
                target: TRACING_TARGET_PAGINATOR,
                next_cursor = ?cursors.next_cursor,
                "Dropped overfetched row"
            );
        }

        if let Some(first) = rows.first() {
            let boundary = cursor_of(first);
            let encoded = self.encode(boundary)?;
            let probe = self.probe_query(executor.table_name_of(first), boundary);

            let count = executor.count(&probe).await.map_err(|error| {
                tracing::warn!(
                    target: TRACING_TARGET_PAGINATOR,
                    error = %error,
                    boundary = %boundary,
                    "Boundary probe failed"
                );
                Error::data_source(error)
            })?;

            if count > 0 {
                cursors.previous_cursor = Some(encoded);
            }

            tracing::trace!(
                target: TRACING_TARGET_PAGINATOR,
                boundary = %boundary,
                count,
                "Probed for rows beyond the boundary"
            );
        }

        if self.direction.is_back() {
            rows.reverse();
            cursors = cursors.swapped();
        }

        Ok(Page {
            items: rows,
            cursors,
        })
    }

    /// Encodes a row cursor, rejecting cursors of a foreign mode.
    fn encode(&self, cursor: Cursor) -> Result<i64> {
        cursor.expect_mode(self.mode)?;
        cursor.encode()
    }
}
