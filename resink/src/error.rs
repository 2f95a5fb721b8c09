use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The write would exceed the buffer's remaining capacity. The entire
    /// write was rejected and the buffer is unchanged.
    #[error("Buffer Full - rejected {requested} bytes, {available} free")]
    BufferFull { requested: usize, available: usize },

    /// A sink write failed (or accepted fewer bytes than given). Handled
    /// internally by the drain task, never returned from `write`.
    #[error("Sink Error - {0}")]
    Sink(String),

    /// The sink factory failed to produce a sink.
    #[error("Connect Error - {0}")]
    Connect(String),

    /// The writer has been shut down.
    #[error("Writer Error - writer is closed")]
    Closed,
}
