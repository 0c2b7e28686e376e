//! Background jobs.

pub mod pool_metrics;

pub use pool_metrics::spawn_pool_metrics;
