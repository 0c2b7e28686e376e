//! Store metrics collection.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record the duration of a key-value operation.
pub fn record_op_duration(op_name: &str, duration_secs: f64) {
    histogram!(
        "kv_operation_duration_seconds",
        "op" => op_name.to_string()
    )
    .record(duration_secs);
}

/// Record database connection pool metrics.
///
/// Call this function periodically to track pool health.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// A helper to time store operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = OpTimer::new("find_by_email");
/// let result = kv.get(&key).await;
/// timer.record();
/// result
/// ```
pub struct OpTimer {
    op_name: String,
    start: Instant,
}

impl OpTimer {
    /// Create a new timer for the given operation name.
    pub fn new(op_name: impl Into<String>) -> Self {
        Self {
            op_name: op_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_op_duration(&self.op_name, duration);
    }
}
