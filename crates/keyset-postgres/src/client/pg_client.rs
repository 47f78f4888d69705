use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use keyset_core::{Cursor, Page, Paginator};

use super::hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgPageRow, PgResult, PooledConnection,
    TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION,
};

/// Acquisitions slower than this are logged as a sign of pool pressure.
const SLOW_ACQUIRE: Duration = Duration::from_millis(100);

/// Connection pool status information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Current number of connections in the pool
    pub size: usize,
    /// Number of idle connections
    pub available: usize,
    /// Number of requests waiting for a connection
    pub waiting: usize,
}

impl PgPoolStatus {
    /// Returns the share of the pool currently checked out (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.size.saturating_sub(self.available) as f64 / self.max_size as f64
        }
    }

    /// Returns whether requests are queueing or the pool is nearly exhausted.
    #[inline]
    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

/// Pooled PostgreSQL client that serves paginated reads.
///
/// Cloning is cheap; all clones share one pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a client and its connection pool.
    ///
    /// Connections are opened lazily, so this succeeds without a reachable
    /// database. Use [`PgClient::connect`] to verify connectivity up front.
    ///
    /// # Errors
    ///
    /// Returns [`PgError::Unexpected`] if the pool cannot be built.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(hooks::establish);
        let manager =
            AsyncDieselConnectionManager::new_with_config(config.connection_url(), manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(hooks::post_create))
            .pre_recycle(Hook::sync_fn(hooks::pre_recycle))
            .post_recycle(Hook::sync_fn(hooks::post_recycle))
            .build()
            .map_err(|error| {
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    error = %error,
                    "Failed to build connection pool"
                );
                PgError::Unexpected(format!("Failed to build connection pool: {error}").into())
            })?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = config.postgres_max_connections,
            statement_timeout_secs = config.postgres_statement_timeout_secs,
            "Database client initialized"
        );

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Creates a client and checks that the database answers a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built, no connection can be
    /// acquired, or the connectivity query fails.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database_url = %config.database_url_masked())
    )]
    pub async fn connect(config: PgConfig) -> PgResult<Self> {
        let this = Self::new(config)?;
        let mut conn = this.get_connection().await?;

        #[derive(diesel::QueryableByName)]
        struct Ping {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            #[allow(dead_code)]
            ok: i32,
        }

        let _: Ping = diesel::sql_query("SELECT 1 AS ok")
            .get_result(conn.as_connection_mut())
            .await
            .map_err(|error| {
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    error = %error,
                    "Database connectivity check failed"
                );
                PgError::from(error)
            })?;

        Ok(this)
    }

    /// Checks a connection out of the pool.
    ///
    /// Waits up to the configured connection timeout.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = Instant::now();
        let conn = self.inner.pool.get().await.map_err(|error| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %error,
                elapsed = ?start.elapsed(),
                "Failed to acquire connection from pool"
            );
            PgError::from(error)
        })?;

        let elapsed = start.elapsed();
        if elapsed > SLOW_ACQUIRE {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed = ?elapsed,
                status = ?self.pool_status(),
                "Connection acquisition took longer than expected"
            );
        }

        Ok(PgConn::new(conn))
    }

    /// Fetches one page on a freshly acquired connection.
    ///
    /// The connection goes back to the pool when the page is assembled.
    ///
    /// # Errors
    ///
    /// A failure to acquire the connection is reported as
    /// [`keyset_core::Error::DataSource`] wrapping the [`PgError`], the same
    /// way fetch and count failures are.
    pub async fn paginate<R, F>(
        &self,
        paginator: &Paginator,
        cursor_of: F,
    ) -> keyset_core::Result<Page<R>>
    where
        R: PgPageRow,
        F: Fn(&R) -> Cursor,
    {
        let mut conn = self
            .get_connection()
            .await
            .map_err(keyset_core::Error::data_source)?;

        paginator.paginate(&mut conn, cursor_of).await
    }

    /// Gets the current pool status.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Gets the configuration this client was built from.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("config", &self.inner.config)
            .field("pool_status", &self.pool_status())
            .finish()
    }
}

/// A connection checked out of a [`PgClient`] pool.
///
/// Implements [`RangeQueryExecutor`] for every [`PgPageRow`], so it can be
/// passed straight to [`Paginator::paginate`]. Dropping it returns the
/// connection to the pool.
///
/// ```ignore
/// let mut conn = client.get_connection().await?;
/// let first = paginator.paginate(&mut conn, |event: &Event| Cursor::Id(event.id)).await?;
/// ```
///
/// [`RangeQueryExecutor`]: keyset_core::RangeQueryExecutor
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Wraps a pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }

    /// Returns the underlying connection.
    #[inline]
    pub fn as_connection_mut(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_status_utilization() {
        let status = PgPoolStatus {
            max_size: 10,
            size: 6,
            available: 2,
            waiting: 0,
        };
        assert!((status.utilization() - 0.4).abs() < f64::EPSILON);
        assert!(!status.is_under_pressure());

        let waiting = PgPoolStatus {
            waiting: 1,
            ..status
        };
        assert!(waiting.is_under_pressure());

        let empty = PgPoolStatus {
            max_size: 0,
            size: 0,
            available: 0,
            waiting: 0,
        };
        assert_eq!(empty.utilization(), 0.0);
    }
}
