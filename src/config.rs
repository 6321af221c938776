use crate::error::{Error, Result};
use crate::executor::PanicStrategy;

/// Upper bound on the CPU-derived default `max_workers`. Explicit values are
/// not capped.
const DEFAULT_MAX_WORKERS_CAP: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Workers started when the pool is built.
    pub initial_workers: usize,
    /// Ceiling the pool may grow to while every worker is busy.
    pub max_workers: usize,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub panic_strategy: PanicStrategy,
}

impl Default for Config {
    fn default() -> Self {
        let max_workers = num_cpus::get().clamp(1, DEFAULT_MAX_WORKERS_CAP);
        Self {
            initial_workers: 2.min(max_workers),
            max_workers,
            thread_name_prefix: "tierpool-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::config("max_workers must be > 0"));
        }
        if self.initial_workers > self.max_workers {
            return Err(Error::config(format!(
                "initial_workers ({}) exceeds max_workers ({})",
                self.initial_workers, self.max_workers
            )));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }
        if self.thread_name_prefix.as_bytes().contains(&0) {
            return Err(Error::config("thread_name_prefix must not contain null bytes"));
        }
        if self.stack_size == Some(0) {
            return Err(Error::config("stack_size must be > 0"));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn initial_workers(mut self, n: usize) -> Self {
        self.config.initial_workers = n;
        self
    }

    pub fn max_workers(mut self, n: usize) -> Self {
        self.config.max_workers = n;
        self
    }

    /// Shorthand for `initial_workers(initial).max_workers(max)`.
    pub fn workers(self, initial: usize, max: usize) -> Self {
        self.initial_workers(initial).max_workers(max)
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
