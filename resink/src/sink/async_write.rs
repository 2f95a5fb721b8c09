use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::Result;
use crate::error::Error;
use crate::sink::Sink;

/// Adapts any tokio [`AsyncWrite`] into a [`Sink`], flushing after each
/// write so bytes are on the wire before the buffer releases them.
pub struct AsyncWriteSink<W> {
    inner: W,
}

impl<W> AsyncWriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> Sink for AsyncWriteSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let written = self
            .inner
            .write(data)
            .await
            .map_err(|e| Error::Sink(e.to_string()))?;
        self.inner
            .flush()
            .await
            .map_err(|e| Error::Sink(e.to_string()))?;
        Ok(written)
    }
}
