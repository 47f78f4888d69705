//! PostgreSQL client with connection pooling.
//!
//! [`PgClient`] owns a `deadpool` pool of `diesel-async` connections and hands
//! out [`PgConn`] wrappers that act as range query executors.

mod hooks;
mod pg_client;
mod pg_config;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
pub use pg_client::{PgClient, PgConn, PgPoolStatus};
pub use pg_config::PgConfig;
pub(crate) use pg_config::mask_url;

/// Connection pool backing a [`PgClient`].
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// A connection checked out of the [`ConnectionPool`].
pub type PooledConnection = Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
