//! Range queries and the executor contract the paginator runs them through.
//!
//! A [`RangeQuery`] is a plain value: a relation, a conjunction of
//! [`Predicate`]s, an optional ordering and an optional row limit. Executors
//! translate it for their store; the paginator never talks to a store
//! directly.

mod executor;
#[cfg(any(test, feature = "memory"))]
mod memory;
mod range;
mod value;

pub use executor::RangeQueryExecutor;
#[cfg(any(test, feature = "memory"))]
pub use memory::{ExecutedQuery, MemoryStore, MemoryStoreError, QueryKind};
pub use range::{Predicate, RangeQuery};
pub use value::Value;
