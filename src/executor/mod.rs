//! Task execution infrastructure.
//!
//! This module provides the worker pool, its worker threads, the task
//! representation, and panic isolation for running tasks.

pub mod panic_handler;
pub mod pool;
pub mod task;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicStrategy, TaskPanic};
pub use pool::{PoolStats, WorkerPool};
pub use task::TaskId;
pub use worker::WorkerId;

pub(crate) use task::Task;
