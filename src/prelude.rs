pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{PanicStrategy, PoolStats, WorkerPool};
pub use crate::scheduler::Priority;
pub use crate::telemetry::MetricsSnapshot;
