#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for paginator orchestration.
///
/// Use this target for logging page fetches, trimming, and cursor computation.
pub const TRACING_TARGET_PAGINATOR: &str = "keyset_core::paginator";

/// Tracing target for range query execution.
///
/// Use this target for logging executor calls and in-memory query evaluation.
pub const TRACING_TARGET_QUERY: &str = "keyset_core::query";

pub mod pagination;
pub mod query;
pub mod types;

use std::borrow::Cow;

pub use crate::pagination::{DEFAULT_LIMIT, MAX_LIMIT, Page, PageCursors, PageRequest, Paginator};
#[cfg(any(test, feature = "memory"))]
pub use crate::query::MemoryStore;
pub use crate::query::{Predicate, RangeQuery, RangeQueryExecutor, Value};
pub use crate::types::{Cursor, CursorMode, Direction, FieldName, Operator, SortOrder};

pub mod error {
    //! Error types and utilities for pagination.
    //!
    //! See [`Error`] for the main error type used throughout this crate.
    //!
    //! [`Error`]: crate::Error

    /// Type-erased error type for dynamic error handling.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
}

/// Error type for all pagination operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "pagination errors should be handled appropriately"]
pub enum Error {
    /// The range query executor failed while fetching rows or counting.
    ///
    /// The underlying error is preserved unmodified and is reachable through
    /// [`std::error::Error::source`].
    #[error("Data source error: {0}")]
    DataSource(#[source] error::BoxError),

    /// A cursor value does not match the declared cursor mode.
    #[error("Cursor type mismatch: expected {expected} cursor, found {found} cursor")]
    TypeMismatch {
        /// Mode the paginator was configured with.
        expected: CursorMode,
        /// Mode of the offending cursor value.
        found: CursorMode,
    },

    /// A cursor value cannot be represented as nanoseconds in an `i64`.
    #[error("Cursor value is out of range: {0}")]
    CursorOutOfRange(Cow<'static, str>),

    /// Invalid paginator configuration.
    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),
}

impl Error {
    /// Wraps an executor error.
    pub fn data_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DataSource(Box::new(error))
    }

    /// Returns whether this error was raised by the underlying data source.
    pub fn is_data_source(&self) -> bool {
        matches!(self, Self::DataSource(_))
    }
}

/// Specialized [`Result`] type for pagination operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
