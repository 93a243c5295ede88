pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] focal_layout::Error),

    #[error("worker `{name}` is no longer running")]
    WorkerDisconnected { name: String },

    #[error("worker `{name}` received a request before its state was initialized")]
    Uninitialized { name: String },

    #[error("engine has no graph loaded")]
    NoGraph,

    #[error("no focal layout has been computed yet")]
    NoLayout,

    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
