pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("pool is shut down")]
    ShutDown,
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// True for the error `try_schedule` returns once shutdown has begun.
    pub fn is_shut_down(&self) -> bool {
        matches!(self, Error::ShutDown)
    }
}
