//! Metrics collection for pool monitoring.

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// 1 hour in nanoseconds
const HISTOGRAM_MAX_NS: u64 = 3_600_000_000_000;

/// Pool metrics collector
#[derive(Debug)]
pub struct Metrics {
    // Task counters
    tasks_executed: AtomicU64,
    tasks_panicked: AtomicU64,
    tasks_dropped: AtomicU64,

    workers_spawned: AtomicU64,
    busy_time_ns: AtomicU64,

    run_histogram: RwLock<Histogram<u64>>,
    wait_histogram: RwLock<Histogram<u64>>,

    start_time: Instant,
}

fn new_histogram() -> Histogram<u64> {
    // Bounds are constants well inside hdrhistogram's accepted range.
    Histogram::new_with_max(HISTOGRAM_MAX_NS, 3).expect("valid histogram bounds")
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            tasks_dropped: AtomicU64::new(0),
            workers_spawned: AtomicU64::new(0),
            busy_time_ns: AtomicU64::new(0),
            run_histogram: RwLock::new(new_histogram()),
            wait_histogram: RwLock::new(new_histogram()),
            start_time: Instant::now(),
        }
    }

    /// Record a finished task, with how long it queued and how long it ran.
    pub fn record_task_execution(&self, waited: Duration, ran: Duration) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);

        let ran_ns = ran.as_nanos().min(HISTOGRAM_MAX_NS as u128) as u64;
        let waited_ns = waited.as_nanos().min(HISTOGRAM_MAX_NS as u128) as u64;
        self.busy_time_ns.fetch_add(ran_ns, Ordering::Relaxed);

        let _ = self.run_histogram.write().record(ran_ns);
        let _ = self.wait_histogram.write().record(waited_ns);
    }

    pub fn record_task_panic(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_task_dropped(&self) {
        self.tasks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let run = self.run_histogram.read();
        let wait = self.wait_histogram.read();

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_executed: self.tasks_executed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            tasks_dropped: self.tasks_dropped.load(Ordering::Relaxed),
            workers_spawned: self.workers_spawned.load(Ordering::Relaxed),
            busy_time_ns: self.busy_time_ns.load(Ordering::Relaxed),
            avg_run_ns: if run.len() > 0 { run.mean() as u64 } else { 0 },
            p50_run_ns: run.value_at_quantile(0.50),
            p99_run_ns: run.value_at_quantile(0.99),
            max_run_ns: run.max(),
            avg_wait_ns: if wait.len() > 0 { wait.mean() as u64 } else { 0 },
            p99_wait_ns: wait.value_at_quantile(0.99),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
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

impl MetricsSnapshot {
    pub fn tasks_per_second(&self) -> f64 {
        let seconds = self.uptime.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.tasks_executed as f64 / seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_basic() {
        let metrics = Metrics::new();

        metrics.record_task_execution(Duration::from_micros(5), Duration::from_micros(1));
        metrics.record_task_execution(Duration::from_micros(5), Duration::from_micros(2));
        metrics.record_task_dropped();
        metrics.record_worker_spawned();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.tasks_executed, 2);
        assert_eq!(snapshot.tasks_dropped, 1);
        assert_eq!(snapshot.workers_spawned, 1);
        assert_eq!(snapshot.busy_time_ns, 3_000);
        assert!(snapshot.avg_run_ns > 0);
        assert!(snapshot.avg_wait_ns > 0);
    }

    #[test]
    fn test_tasks_per_second() {
        let snapshot = MetricsSnapshot {
            uptime: Duration::from_secs(2),
            tasks_executed: 10,
            ..Default::default()
        };
        assert_eq!(snapshot.tasks_per_second(), 5.0);
        assert_eq!(MetricsSnapshot::default().tasks_per_second(), 0.0);
    }
}
