pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("transform failed: {0}")]
    TransformFailed(String),

    #[error("worker panic: {0}")]
    WorkerPanic(String),

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("executor error: {0}")]
    Executor(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("already initialized")]
    AlreadyInitialized,
}

impl Error {
    pub fn transform<E: std::fmt::Display>(err: E) -> Self {
        Error::TransformFailed(err.to_string())
    }

    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// True for the marker carried by partitions abandoned after a sibling failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
