//! Pool metrics.
//!
//! Counters and latency histograms are collected with the `telemetry`
//! feature; without it a no-op collector with the same API is compiled.

#[cfg(feature = "telemetry")]
pub mod metrics;

#[cfg(feature = "telemetry")]
pub use metrics::{Metrics, MetricsSnapshot};

// Stub implementations when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub mod metrics {
    use std::time::Duration;

    #[derive(Debug, Default)]
    pub struct Metrics;

    impl Metrics {
        pub fn new() -> Self { Self }
        pub fn record_task_execution(&self, _: Duration, _: Duration) {}
        pub fn record_task_panic(&self) {}
        pub fn record_task_dropped(&self) {}
        pub fn record_worker_spawned(&self) {}
        pub fn snapshot(&self) -> MetricsSnapshot { MetricsSnapshot::default() }
    }

    #[derive(Debug, Clone, Default)]
    pub struct MetricsSnapshot {
        pub uptime: Duration,
        pub tasks_executed: u64,
        pub tasks_panicked: u64,
        pub tasks_dropped: u64,
        pub workers_spawned: u64,
        pub busy_time_ns: u64,
        pub avg_run_ns: u64,
        pub p50_run_ns: u64,
        pub p99_run_ns: u64,
        pub max_run_ns: u64,
        pub avg_wait_ns: u64,
        pub p99_wait_ns: u64,
    }
}

#[cfg(not(feature = "telemetry"))]
pub use metrics::{Metrics, MetricsSnapshot};
