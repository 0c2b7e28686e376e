//! Background job sampling connection-pool gauges.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How often the pool gauges are sampled.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(10);

/// Spawns a loop recording the `database_connections_*` gauges for the
/// given pool until the token fires.
pub fn spawn_pool_metrics(pool: PgPool, token: CancellationToken) -> JoinHandle<()> {
    spawn_with_interval(pool, token, SAMPLE_INTERVAL)
}

fn spawn_with_interval(
    pool: PgPool,
    token: CancellationToken,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("pool metrics job cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    store::metrics::record_pool_metrics(&pool);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    // A lazy pool never connects, so sampling size/idle gauges is safe
    // without a database.
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://earlybird@localhost/earlybird")
            .unwrap()
    }

    #[tokio::test]
    async fn test_pool_metrics_job_ticks_and_cancels() {
        let token = CancellationToken::new();
        let handle = spawn_with_interval(lazy_pool(), token.clone(), Duration::from_millis(1));

        tokio::time::sleep(Duration::from_millis(20)).await;

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_pool_metrics_job_stops_promptly_when_cancelled_first() {
        let token = CancellationToken::new();
        token.cancel();
        let handle = spawn_with_interval(lazy_pool(), token, Duration::from_secs(3600));
        handle.await.unwrap();
    }
}
