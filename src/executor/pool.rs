use super::panic_handler::PanicHandler;
use super::task::Task;
use super::worker::{self, Worker};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::scheduler::{Priority, PriorityBucketQueue};
use crate::telemetry::{Metrics, MetricsSnapshot};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Everything the single pool lock guards.
pub(crate) struct PoolState {
    pub(crate) queue: PriorityBucketQueue<Task>,
    /// Workers ever started. Never decreases.
    pub(crate) worker_count: usize,
    /// Workers currently running a task.
    pub(crate) busy_count: usize,
    /// Workers that reached their terminal state.
    pub(crate) exited: usize,
    pub(crate) shutdown_requested: bool,
    handles: Vec<JoinHandle<()>>,
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<PoolState>,
    pub(crate) cond: Condvar,
    pub(crate) panic_handler: PanicHandler,
    pub(crate) metrics: Metrics,
    config: Config,
}

impl Shared {
    /// Start one worker and record it. Caller holds the lock.
    fn spawn_worker(self: &Arc<Self>, state: &mut PoolState) -> Result<()> {
        let id = state.worker_count;
        let name = format!("{}-{}", self.config.thread_name_prefix, id);

        let mut builder = thread::Builder::new().name(name);
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let worker = Worker::new(id, Arc::clone(self));
        let handle = builder.spawn(move || worker.run()).map_err(Error::Spawn)?;

        state.handles.push(handle);
        state.worker_count += 1;
        self.metrics.record_worker_spawned();
        debug!(worker = id, worker_count = state.worker_count, "spawned worker");

        Ok(())
    }
}

/// A worker pool that dispatches tasks by priority class and grows on demand.
///
/// Tasks are dequeued strictly by class (`High`, `Medium`, `Low`, `Default`)
/// and FIFO within a class. When every worker is busy at submission time the
/// pool starts one more worker, up to `max_workers`. Workers are never
/// retired before [`shutdown`](WorkerPool::shutdown).
///
/// ```no_run
/// use tierpool::{Priority, WorkerPool};
///
/// let pool = WorkerPool::new(2, 4)?;
/// pool.schedule(Priority::High, || println!("first"));
/// pool.schedule("nightly", || println!("runs as Default"));
/// pool.shutdown();
/// # Ok::<(), tierpool::Error>(())
/// ```
pub struct WorkerPool {
    shared: Arc<Shared>,
}

impl WorkerPool {
    /// Start `initial_workers` workers, allowing growth up to `max_workers`.
    pub fn new(initial_workers: usize, max_workers: usize) -> Result<Self> {
        let config = Config::builder()
            .workers(initial_workers, max_workers)
            .build()?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let initial_workers = config.initial_workers;
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: PriorityBucketQueue::new(),
                worker_count: 0,
                busy_count: 0,
                exited: 0,
                shutdown_requested: false,
                handles: Vec::with_capacity(config.max_workers),
            }),
            cond: Condvar::new(),
            panic_handler: PanicHandler::new(config.panic_strategy),
            metrics: Metrics::new(),
            config,
        });

        let pool = Self { shared };
        {
            // On failure `pool` drops here and joins whatever already started.
            let mut state = pool.shared.state.lock();
            for _ in 0..initial_workers {
                pool.shared.spawn_worker(&mut state)?;
            }
        }

        Ok(pool)
    }

    /// Submit `f` under `priority`. Unknown priority values run as
    /// [`Priority::Default`].
    ///
    /// Never blocks on the task. Once shutdown has begun the task is dropped
    /// without notice; use [`try_schedule`](Self::try_schedule) to observe that.
    pub fn schedule<P, F>(&self, priority: P, f: F)
    where
        P: Into<Priority>,
        F: FnOnce() + Send + 'static,
    {
        let _ = self.try_schedule(priority, f);
    }

    /// Like [`schedule`](Self::schedule), but reports [`Error::ShutDown`]
    /// instead of dropping silently.
    pub fn try_schedule<P, F>(&self, priority: P, f: F) -> Result<()>
    where
        P: Into<Priority>,
        F: FnOnce() + Send + 'static,
    {
        let priority = priority.into();
        let mut state = self.shared.state.lock();

        if state.shutdown_requested {
            drop(state);
            self.shared.metrics.record_task_dropped();
            debug!(%priority, "pool shut down, task dropped");
            return Err(Error::ShutDown);
        }

        let task = Task::new(f, priority);
        trace!(task = %task.id, %priority, "task queued");
        state.queue.add(priority, task);

        // saturated: every started worker is running something
        if state.busy_count == state.worker_count
            && state.worker_count < self.shared.config.max_workers
        {
            if let Err(err) = self.shared.spawn_worker(&mut state) {
                warn!(error = %err, worker_count = state.worker_count, "failed to grow pool");
            }
        }

        self.shared.cond.notify_one();
        Ok(())
    }

    /// Submit `f` at [`Priority::Default`].
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(Priority::Default, f);
    }

    /// Stop accepting tasks, let the workers drain everything already queued,
    /// and block until they have all exited.
    ///
    /// Calling it again, or concurrently, is safe: every caller returns only
    /// once the workers are gone. Called from inside a task, it only stops
    /// intake and wakes idle workers; joining is left to a caller outside the
    /// pool (or to `Drop`), since a worker cannot wait for itself.
    pub fn shutdown(&self) {
        let in_task = worker::is_worker_of(&self.shared);
        let handles = {
            let mut state = self.shared.state.lock();
            if !state.shutdown_requested {
                state.shutdown_requested = true;
                debug!(
                    worker_count = state.worker_count,
                    queued = state.queue.len(),
                    "shutdown requested"
                );
                self.shared.cond.notify_all();
            }
            if in_task {
                return;
            }
            std::mem::take(&mut state.handles)
        };

        if handles.is_empty() {
            self.wait_for_exit();
            return;
        }

        for handle in handles {
            if handle.join().is_err() {
                warn!("worker thread terminated by panic");
            }
        }

        debug!("shutdown complete");
    }

    // Another caller owns the join handles; wait on the exit count instead.
    fn wait_for_exit(&self) {
        let mut state = self.shared.state.lock();
        while state.exited < state.worker_count {
            self.shared.cond.wait(&mut state);
        }
    }

    pub fn worker_count(&self) -> usize {
        self.shared.state.lock().worker_count
    }

    pub fn busy_count(&self) -> usize {
        self.shared.state.lock().busy_count
    }

    pub fn max_workers(&self) -> usize {
        self.shared.config.max_workers
    }

    /// Tasks queued but not yet picked up by a worker.
    pub fn pending_tasks(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.state.lock().shutdown_requested
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.shared.state.lock();
        PoolStats {
            worker_count: state.worker_count,
            max_workers: self.shared.config.max_workers,
            busy_count: state.busy_count,
            exited: state.exited,
            queued: state.queue.depths(),
            shutdown_requested: state.shutdown_requested,
            panicked_tasks: self.shared.panic_handler.panic_count(),
        }
    }

    /// Counters and latency percentiles. Zeroed unless built with the
    /// `telemetry` feature.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Point-in-time view of the pool's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub worker_count: usize,
    pub max_workers: usize,
    pub busy_count: usize,
    pub exited: usize,
    /// Queue depth per class, in [`Priority::ALL`] order.
    pub queued: [usize; 4],
    pub shutdown_requested: bool,
    pub panicked_tasks: usize,
}

impl PoolStats {
    pub fn queued_of(&self, priority: Priority) -> usize {
        self.queued[priority.rank()]
    }

    pub fn total_queued(&self) -> usize {
        self.queued.iter().sum()
    }

    pub fn idle_count(&self) -> usize {
        self.worker_count - self.exited - self.busy_count
    }

    /// Every live worker is running a task.
    pub fn is_saturated(&self) -> bool {
        self.busy_count == self.worker_count - self.exited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn test_new_starts_initial_workers() {
        let pool = WorkerPool::new(3, 5).unwrap();
        assert_eq!(pool.worker_count(), 3);
        assert_eq!(pool.max_workers(), 5);
        assert_eq!(pool.busy_count(), 0);
        pool.shutdown();
    }

    #[test]
    fn test_rejects_initial_above_max() {
        assert!(matches!(WorkerPool::new(4, 2), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_initial_grows_on_first_schedule() {
        let pool = WorkerPool::new(0, 2).unwrap();
        assert_eq!(pool.worker_count(), 0);

        let (tx, rx) = unbounded();
        pool.execute(move || tx.send(()).unwrap());

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(pool.worker_count(), 1);
        pool.shutdown();
    }

    #[test]
    fn test_try_schedule_after_shutdown() {
        let pool = WorkerPool::new(1, 1).unwrap();
        pool.shutdown();

        let err = pool.try_schedule(Priority::High, || {}).unwrap_err();
        assert!(err.is_shut_down());
        assert!(pool.is_shutdown());
        assert_eq!(pool.pending_tasks(), 0);
    }

    #[test]
    fn test_stats_after_shutdown() {
        let pool = WorkerPool::new(2, 2).unwrap();
        pool.shutdown();

        let stats = pool.stats();
        assert_eq!(stats.worker_count, 2);
        assert_eq!(stats.exited, 2);
        assert_eq!(stats.busy_count, 0);
        assert_eq!(stats.total_queued(), 0);
        assert!(stats.shutdown_requested);
        assert_eq!(stats.idle_count(), 0);
    }

    #[test]
    fn test_thread_names_use_prefix() {
        let config = Config::builder()
            .workers(1, 1)
            .thread_name_prefix("tier-test")
            .build()
            .unwrap();
        let pool = WorkerPool::with_config(config).unwrap();

        let (tx, rx) = unbounded();
        pool.execute(move || {
            let name = thread::current().name().map(str::to_owned);
            tx.send(name).unwrap();
        });

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("tier-test-0"));
    }

    #[test]
    fn test_drop_drains_queue() {
        let (tx, rx) = unbounded();
        {
            let pool = WorkerPool::new(1, 1).unwrap();
            for i in 0..10 {
                let tx = tx.clone();
                pool.execute(move || tx.send(i).unwrap());
            }
        }
        drop(tx);

        assert_eq!(rx.iter().count(), 10);
    }
}
