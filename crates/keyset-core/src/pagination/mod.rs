//! Bidirectional keyset pagination.
//!
//! A [`Paginator`] describes one page request: which field to order by, in
//! which order, which way to move from the incoming cursor and how many rows
//! to return. Running it against a [`RangeQueryExecutor`] yields a [`Page`]
//! carrying the rows and the cursors for the neighbouring pages.
//!
//! Rows are fetched with one extra row to detect a further page in the
//! traversal direction, and a single limited count probes for a page on the
//! other side. Backward traversal queries the store in reverse and reverses
//! the result, so callers always observe rows in their requested order.
//!
//! [`RangeQueryExecutor`]: crate::RangeQueryExecutor

mod assembler;
mod page;
mod paginator;
mod request;

pub use page::{Page, PageCursors};
pub use paginator::Paginator;
pub use request::PageRequest;

/// Default number of rows per page.
pub const DEFAULT_LIMIT: u32 = 50;

/// Maximum number of rows per page.
pub const MAX_LIMIT: u32 = 1000;
