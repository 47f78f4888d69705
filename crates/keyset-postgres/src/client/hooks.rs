//! Connection setup callback and pool lifecycle hooks.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::mask_url;
use crate::TRACING_TARGET_CONNECTION;

/// Establishes a new pooled connection, timing and logging the attempt.
///
/// Installed as the [`ManagerConfig`] setup callback.
///
/// [`ManagerConfig`]: diesel_async::pooled_connection::ManagerConfig
pub(crate) fn establish<C>(url: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    async move {
        let start = Instant::now();
        let result = C::establish(url).await;

        match &result {
            Ok(_) => tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                url = %mask_url(url),
                elapsed_ms = start.elapsed().as_millis(),
                "Established database connection"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                url = %mask_url(url),
                elapsed_ms = start.elapsed().as_millis(),
                error = %error,
                "Failed to establish database connection"
            ),
        }

        result
    }
    .boxed()
}

/// Logs a connection joining the pool.
pub(crate) fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    inspect("post_create", conn, metrics);
    Ok(())
}

/// Logs a connection about to be handed out again.
pub(crate) fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    inspect("pre_recycle", conn, metrics);
    Ok(())
}

/// Logs a connection after it passed the manager's recycle check.
pub(crate) fn post_recycle(
    conn: &mut AsyncPgConnection,
    metrics: &Metrics,
) -> HookResult<PoolError> {
    inspect("post_recycle", conn, metrics);
    Ok(())
}

fn inspect(hook: &'static str, conn: &mut AsyncPgConnection, metrics: &Metrics) {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            hook,
            age = ?metrics.age(),
            recycle_count = metrics.recycle_count,
            "Pooled connection is broken"
        );
    } else {
        tracing::trace!(
            target: TRACING_TARGET_CONNECTION,
            hook,
            age = ?metrics.age(),
            recycle_count = metrics.recycle_count,
            "Pooled connection is healthy"
        );
    }
}
