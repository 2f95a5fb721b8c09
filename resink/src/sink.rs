use crate::Result;

/// [BlackholeSink] accepts and discards everything, semantic equivalent of `/dev/null`.
#[path = "sink/blackhole.rs"]
mod blackhole;

/// [AsyncWriteSink] bridges any tokio `AsyncWrite` (file, socket) to [Sink].
#[path = "sink/async_write.rs"]
mod async_write;

pub use async_write::AsyncWriteSink;
pub use blackhole::BlackholeSink;

/// A destination that accepts flushed bytes.
///
/// `write` returns how many of the given bytes were accepted. Returning
/// `Ok(k)` with `k < data.len()` is a short write: the writer accounts for
/// the `k` delivered bytes and then treats the sink as broken, exactly as it
/// would a hard error.
#[trait_variant::make(Sink: Send)]
#[allow(dead_code)]
pub trait LocalSink {
    async fn write(&mut self, data: &[u8]) -> Result<usize>;
}

/// Produces a new [Sink], both for first initialization and for
/// reconnect-on-failure.
///
/// The writer calls this once at construction and again after every flush
/// failure, so implementations must tolerate being invoked arbitrarily many
/// times, including repeatedly after failures.
#[trait_variant::make(SinkFactory: Send)]
#[allow(dead_code)]
pub trait LocalSinkFactory {
    type Sink: Sink + Send + 'static;

    async fn connect(&mut self) -> Result<Self::Sink>;
}
