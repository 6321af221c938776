//! tierpool - a priority-class worker pool
//!
//! A thread pool that dispatches submitted closures by priority class and
//! grows its worker count on demand up to a fixed ceiling.
//!
//! # Quick Start
//!
//! ```no_run
//! use tierpool::prelude::*;
//!
//! let pool = WorkerPool::new(2, 4)?;
//!
//! pool.schedule(Priority::Low, || println!("report"));
//! pool.schedule(Priority::High, || println!("alert"));
//! pool.execute(|| println!("housekeeping"));
//!
//! // Runs everything already queued, then joins the workers.
//! pool.shutdown();
//! # Ok::<(), tierpool::Error>(())
//! ```
//!
//! # Dispatch rules
//!
//! - **Strict class order**: a queued `High` task always runs before any
//!   queued `Medium`, `Low` or `Default` task. Order is decided when a worker
//!   picks up its next task; running tasks are never preempted.
//! - **FIFO within a class**: equal-priority tasks start in submission order.
//! - **Unknown priorities**: any name or number outside the four classes is
//!   treated as `Default`.
//! - **Growth**: a submission that finds every worker busy starts one more
//!   worker, up to `max_workers`. The pool never shrinks.
//! - **Shutdown**: queued work is drained before workers exit; submissions
//!   after shutdown are dropped (or reported by `try_schedule`).

// Lint configuration
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod scheduler;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, PoolStats, WorkerPool};
pub use scheduler::{Priority, PriorityBucketQueue};
pub use telemetry::MetricsSnapshot;

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_schedule_and_shutdown() {
        let pool = WorkerPool::new(2, 4).unwrap();
        let counter = Arc::new(Mutex::new(0));

        for i in 0..20u8 {
            let counter = counter.clone();
            pool.schedule(i % 5, move || {
                *counter.lock() += 1;
            });
        }

        pool.shutdown();
        assert_eq!(*counter.lock(), 20);
    }

    #[test]
    fn test_pool_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkerPool>();
    }
}
