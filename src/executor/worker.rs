// worker thread loop
use super::pool::Shared;
use super::task::Task;
use std::cell::Cell;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

pub type WorkerId = usize;

thread_local! {
    // Address of the `Shared` this thread works for, 0 off-pool.
    static CURRENT_POOL: Cell<usize> = const { Cell::new(0) };
}

/// Whether the calling thread is one of the workers behind `shared`.
pub(crate) fn is_worker_of(shared: &Arc<Shared>) -> bool {
    CURRENT_POOL.with(|cell| cell.get() == Arc::as_ptr(shared) as usize)
}

/// Decrements the busy counter and wakes one waiter on every exit path from
/// task execution.
struct BusyGuard<'a> {
    shared: &'a Shared,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.busy_count -= 1;
        self.shared.cond.notify_one();
    }
}

pub(crate) struct Worker {
    pub id: WorkerId,
    shared: Arc<Shared>,
    tasks_executed: u64,
}

impl Worker {
    pub fn new(id: WorkerId, shared: Arc<Shared>) -> Self {
        Self {
            id,
            shared,
            tasks_executed: 0,
        }
    }

    // main loop
    pub fn run(mut self) {
        let shared = Arc::clone(&self.shared);
        CURRENT_POOL.with(|cell| cell.set(Arc::as_ptr(&shared) as usize));
        debug!(worker = self.id, "worker started");

        while let Some(task) = self.next_task() {
            let _busy = BusyGuard { shared: &shared };
            self.execute_task(task);
        }

        CURRENT_POOL.with(|cell| cell.set(0));
        debug!(
            worker = self.id,
            tasks_executed = self.tasks_executed,
            "worker exiting"
        );
    }

    /// Block until a task is available. `None` means the queue is drained and
    /// shutdown was requested, so the worker must exit.
    fn next_task(&self) -> Option<Task> {
        let mut state = self.shared.state.lock();

        loop {
            if let Some(task) = state.queue.next() {
                state.busy_count += 1;
                return Some(task);
            }

            if state.shutdown_requested {
                state.exited += 1;
                // wake concurrent shutdown callers counting exits
                self.shared.cond.notify_all();
                return None;
            }

            self.shared.cond.wait(&mut state);
        }
    }

    fn execute_task(&mut self, task: Task) {
        let id = task.id;
        let waited = task.waited();
        trace!(worker = self.id, task = %id, priority = %task.priority, "running task");

        let start = Instant::now();
        let result = self.shared.panic_handler.execute(id, || task.execute());

        if result.is_err() {
            self.shared.metrics.record_task_panic();
        }
        self.shared.metrics.record_task_execution(waited, start.elapsed());
        self.tasks_executed += 1;
    }
}
