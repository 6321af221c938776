//! Priority classes and the bucketed dispatch queue.
//!
//! The queue decides *which* pending task runs next; the worker pool in
//! [`crate::executor`] decides *when* and on which worker.

pub mod priority;

pub use priority::{Priority, PriorityBucketQueue};
