use bytes::Bytes;

use crate::Result;
use crate::error::Error;

/// Bounded FIFO byte buffer holding data not yet flushed to the sink.
///
/// Invariant: `len() <= capacity` at all times. Appends are all-or-nothing;
/// a push that does not fit is rejected wholesale and leaves the contents
/// untouched.
pub(crate) struct ReplayBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl ReplayBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `bytes` behind the pending data. Returns the accepted count,
    /// which is always `bytes.len()`; if that many bytes do not fit, nothing
    /// is accepted and [`Error::BufferFull`] is returned.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Result<usize> {
        let available = self.capacity - self.data.len();
        if bytes.len() > available {
            return Err(Error::BufferFull {
                requested: bytes.len(),
                available,
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Copy of the pending bytes, front first. Taken by the drain task so the
    /// actual sink write happens outside the buffer lock.
    pub(crate) fn snapshot(&self) -> Bytes {
        Bytes::copy_from_slice(&self.data)
    }

    /// Drops the first `count` bytes (the prefix a sink accepted), shifting
    /// the remainder to the front. `count` must not exceed `len()`.
    pub(crate) fn consume(&mut self, count: usize) {
        self.data.drain(..count);
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}
