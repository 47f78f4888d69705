use std::borrow::Cow;

use super::{MAX_LIMIT, Page, PageRequest};
use crate::query::{RangeQuery, RangeQueryExecutor};
use crate::types::{Cursor, CursorMode, Direction, FieldName, Operator, SortOrder};
use crate::{Error, Result, TRACING_TARGET_PAGINATOR};

/// Immutable description of a single keyset page request.
///
/// The paginator only holds configuration; running it returns a fresh
/// [`Page`] and leaves the paginator untouched, so it can be cloned and shared
/// freely.
///
/// ## Example
///
/// ```rust
/// use keyset_core::{Cursor, CursorMode, Direction, Paginator, SortOrder};
///
/// let paginator = Paginator::new(CursorMode::Identifier, "id")?
///     .with_order(SortOrder::Descending)
///     .with_direction(Direction::Next)
///     .with_limit(3)?
///     .with_cursor(Cursor::Id(8))?;
///
/// assert_eq!(paginator.limit(), 3);
/// # Ok::<(), keyset_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "paginators do nothing unless run with `paginate`"]
pub struct Paginator {
    pub(super) mode: CursorMode,
    pub(super) order: SortOrder,
    pub(super) direction: Direction,
    pub(super) limit: u32,
    pub(super) sort_field: FieldName,
    pub(super) cursor: Option<Cursor>,
    pub(super) scope: RangeQuery,
}

impl Paginator {
    /// Creates a paginator over `sort_field` for the first page.
    ///
    /// Defaults to descending order, forward traversal and
    /// [`DEFAULT_LIMIT`](super::DEFAULT_LIMIT) rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `sort_field` is not a plain identifier.
    pub fn new(mode: CursorMode, sort_field: impl Into<String>) -> Result<Self> {
        Ok(Self {
            mode,
            order: SortOrder::default(),
            direction: Direction::default(),
            limit: super::DEFAULT_LIMIT,
            sort_field: FieldName::new(sort_field)?,
            cursor: None,
            scope: RangeQuery::new(),
        })
    }

    /// Creates a paginator from a transport request.
    ///
    /// # Errors
    ///
    /// Fails if the sort field or limit is invalid, or if the raw cursor
    /// cannot be decoded in `mode`.
    pub fn from_request(
        mode: CursorMode,
        sort_field: impl Into<String>,
        request: &PageRequest,
    ) -> Result<Self> {
        Self::new(mode, sort_field)?
            .with_order(request.order)
            .with_direction(request.direction)
            .with_limit(request.limit)?
            .with_raw_cursor(request.cursor)
    }

    /// Sets the caller-visible sort order.
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the traversal direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the page size; `0` turns pagination off and returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `limit` exceeds [`MAX_LIMIT`].
    pub fn with_limit(mut self, limit: u32) -> Result<Self> {
        if limit > MAX_LIMIT {
            return Err(Error::Config(
                format!("limit must not exceed {MAX_LIMIT}, got {limit}").into(),
            ));
        }

        self.limit = limit;
        Ok(self)
    }

    /// Continues from a typed cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the cursor does not belong to the
    /// paginator's mode.
    pub fn with_cursor(mut self, cursor: Cursor) -> Result<Self> {
        cursor.expect_mode(self.mode)?;
        self.cursor = Some(cursor);
        Ok(self)
    }

    /// Continues from an optional raw cursor, decoded per the paginator's mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorOutOfRange`] if a time cursor cannot be decoded.
    pub fn with_raw_cursor(mut self, raw: Option<i64>) -> Result<Self> {
        self.cursor = Cursor::decode_opt(raw, self.mode)?;
        Ok(self)
    }

    /// Sets the base query every page fetch and probe is built on.
    ///
    /// Use it to pick the relation and to add the caller's own filters. The
    /// scope's ordering is replaced by the sort field and its row limit by
    /// the page size, so an unpaged fetch returns every row in scope.
    pub fn with_scope(mut self, scope: RangeQuery) -> Self {
        self.scope = scope;
        self
    }

    /// Returns the cursor mode.
    #[inline]
    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Returns the caller-visible sort order.
    #[inline]
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Returns the traversal direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the page size.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the field pages are ordered and filtered by.
    #[inline]
    pub fn sort_field(&self) -> &FieldName {
        &self.sort_field
    }

    /// Returns the incoming cursor, if any.
    #[inline]
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Returns whether page-size limiting and cursor metadata are enabled.
    #[inline]
    pub fn has_limit(&self) -> bool {
        self.limit > 0
    }

    /// Builds the query fetching this page.
    ///
    /// Orders by the sort field in the effective order, overfetches by one
    /// row when limited, and filters past the incoming cursor.
    pub fn page_query(&self) -> RangeQuery {
        let mut query = self.scope.clone().with_order(
            self.sort_field.clone(),
            self.order.effective(self.direction),
        );

        query = if self.has_limit() {
            query.with_limit(i64::from(self.limit) + 1)
        } else {
            query.without_limit()
        };

        if let Some(cursor) = self.cursor {
            let operator = Operator::resolve(self.order, self.direction);
            query = query.with_predicate(self.sort_field.clone(), operator, cursor);
        }

        query
    }

    /// Builds the query probing for rows on the other side of `boundary`.
    ///
    /// The probe looks in the direction opposite to the traversal and stops at
    /// the first matching row.
    pub fn probe_query(&self, table: Cow<'static, str>, boundary: Cursor) -> RangeQuery {
        let operator = Operator::resolve(self.order, self.direction.opposite());

        self.scope
            .clone()
            .with_table(table)
            .with_predicate(self.sort_field.clone(), operator, boundary)
            .with_limit(1)
    }

    /// Fetches the page this paginator describes.
    ///
    /// `cursor_of` maps a row to its sort key; it must return cursors of the
    /// paginator's mode.
    ///
    /// # Errors
    ///
    /// - [`Error::DataSource`] if the fetch or the boundary count fails; no
    ///   rows are returned in that case.
    /// - [`Error::TypeMismatch`] if `cursor_of` yields a cursor of the wrong
    ///   mode.
    /// - [`Error::CursorOutOfRange`] if a boundary timestamp cannot be encoded.
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_PAGINATOR,
        fields(
            mode = %self.mode,
            order = %self.order,
            direction = %self.direction,
            limit = self.limit,
            sort_field = %self.sort_field,
        )
    )]
    pub async fn paginate<R, E, F>(&self, executor: &mut E, cursor_of: F) -> Result<Page<R>>
    where
        E: RangeQueryExecutor<R>,
        F: Fn(&R) -> Cursor,
    {
        let query = self.page_query();

        tracing::debug!(
            target: TRACING_TARGET_PAGINATOR,
            cursor = ?self.cursor,
            "Fetching page"
        );

        let rows = executor.fetch(&query).await.map_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET_PAGINATOR,
                error = %error,
                "Page fetch failed"
            );
            Error::data_source(error)
        })?;

        if !self.has_limit() {
            tracing::debug!(
                target: TRACING_TARGET_PAGINATOR,
                rows = rows.len(),
                "Fetched unpaged rows"
            );
            return Ok(Page::unpaged(rows));
        }

        let page = self.assemble(rows, executor, &cursor_of).await?;

        tracing::debug!(
            target: TRACING_TARGET_PAGINATOR,
            rows = page.items.len(),
            next_cursor = ?page.cursors.next_cursor,
            previous_cursor = ?page.cursors.previous_cursor,
            "Page assembled"
        );

        Ok(page)
    }
}
