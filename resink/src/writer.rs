use std::sync::Arc;

use backoff::strategy::exponential::Exponential;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::buffer::ReplayBuffer;
use crate::config::RetryConfig;
use crate::error::Error;
use crate::sink::{Sink, SinkFactory};

/// State shared between producer handles and the drain task. The buffer lock
/// is held only for memcpy-scale operations, never across sink I/O or
/// factory calls, so producers are not stalled by a slow sink.
struct Shared {
    buffer: Mutex<ReplayBuffer>,
    /// Wakes the drain task when a producer appends into an empty buffer.
    has_data: Notify,
}

/// ReplayWriterBuilder builds a [ReplayWriter] and starts its drain task.
pub struct ReplayWriterBuilder<F> {
    factory: F,
    capacity: usize,
    retry_config: RetryConfig,
}

impl<F> ReplayWriterBuilder<F>
where
    F: SinkFactory + 'static,
{
    /// `capacity` is the maximum number of unflushed bytes the writer will
    /// hold; with capacity 0 every nonzero write fails with
    /// [`Error::BufferFull`].
    pub fn new(factory: F, capacity: usize) -> Self {
        Self {
            factory,
            capacity,
            retry_config: RetryConfig::default(),
        }
    }

    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Builds the writer and spawns the drain task.
    ///
    /// The factory is invoked once up front; its error, if any, is handed
    /// back alongside the writer but never prevents construction. The drain
    /// task starts either way and keeps retrying the factory on its own.
    pub async fn build(mut self) -> (ReplayWriter, Option<Error>) {
        let shared = Arc::new(Shared {
            buffer: Mutex::new(ReplayBuffer::new(self.capacity)),
            has_data: Notify::new(),
        });

        let (sink, initial_err) = match self.factory.connect().await {
            Ok(sink) => (Some(sink), None),
            Err(e) => {
                warn!(error = %e, "Initial sink connect failed, drain task will keep retrying");
                (None, Some(e))
            }
        };

        let cancel = CancellationToken::new();
        let task = DrainTask {
            factory: self.factory,
            sink,
            shared: Arc::clone(&shared),
            backoff: self.retry_config.backoff(),
            cancel: cancel.clone(),
        };
        let drain_task = tokio::spawn(task.run());

        (
            ReplayWriter {
                shared,
                cancel,
                drain_task: Arc::new(Mutex::new(Some(drain_task))),
            },
            initial_err,
        )
    }
}

/// Producer-facing handle to the resilient buffered writer. Cheap to clone;
/// all clones feed the same buffer and drain task.
#[derive(Clone)]
pub struct ReplayWriter {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    drain_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ReplayWriter {
    /// Appends `bytes` behind the pending data, all or nothing. Returns the
    /// accepted count (always `bytes.len()` on success), or
    /// [`Error::BufferFull`] leaving the buffer unchanged. Never blocks on
    /// sink I/O.
    pub fn write(&self, bytes: &[u8]) -> Result<usize> {
        if self.cancel.is_cancelled() {
            return Err(Error::Closed);
        }
        let accepted = self.shared.buffer.lock().push(bytes)?;
        if accepted > 0 {
            self.shared.has_data.notify_one();
        }
        Ok(accepted)
    }

    /// Number of bytes buffered but not yet flushed to the sink.
    pub fn pending(&self) -> usize {
        self.shared.buffer.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.shared.buffer.lock().capacity()
    }

    /// Stops the drain task and waits for it to finish. Remaining buffered
    /// bytes are flushed on a best-effort basis; subsequent `write` calls
    /// fail with [`Error::Closed`]. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.drain_task.lock().take();
        if let Some(task) = task {
            info!("Waiting for drain task to stop");
            if let Err(e) = task.await {
                error!(error = %e, "Drain task panicked");
            }
        }
    }
}

/// The single background task owning the sink handle. Flushes buffered bytes
/// to the current sink and replaces the sink through the factory whenever a
/// flush fails, backing off between failed attempts.
struct DrainTask<F>
where
    F: SinkFactory,
{
    factory: F,
    sink: Option<F::Sink>,
    shared: Arc<Shared>,
    backoff: Exponential,
    cancel: CancellationToken,
}

impl<F> DrainTask<F>
where
    F: SinkFactory,
{
    async fn run(mut self) {
        let cancel = self.cancel.clone();
        loop {
            if cancel.is_cancelled() {
                break;
            }
            // Cancellation is only observed between steps and inside the
            // parked/backoff waits; a flush that has started always runs to
            // completion so delivered bytes are consumed exactly once.
            match self.step().await {
                Ok(()) => self.backoff.reset(),
                Err(e) => {
                    warn!(
                        error = %e,
                        attempt = self.backoff.current_attempt() + 1,
                        "Sink unavailable, backing off"
                    );
                    // unbounded strategy, next() is always Some
                    if let Some(delay) = self.backoff.next() {
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = sleep(delay) => {}
                        }
                    }
                }
            }
        }
        self.final_drain().await;
        info!("Drain task stopped");
    }

    /// One iteration of the drain loop: establish a sink if absent, else
    /// flush pending bytes, parking until data arrives when there are none.
    async fn step(&mut self) -> Result<()> {
        if self.sink.is_none() {
            let sink = self.factory.connect().await?;
            info!("Sink established");
            self.sink = Some(sink);
            return Ok(());
        }

        if self.shared.buffer.lock().is_empty() {
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = self.shared.has_data.notified() => {}
            }
            return Ok(());
        }

        // Snapshot under the lock, write outside it. Only this task consumes
        // from the buffer, so the snapshot stays the buffer's prefix even if
        // producers append meanwhile.
        let pending = self.shared.buffer.lock().snapshot();
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        let result = sink.write(&pending).await;

        match result {
            Ok(written) if written == pending.len() => {
                self.shared.buffer.lock().consume(written);
                debug!(bytes = written, "Flushed buffered bytes to sink");
                Ok(())
            }
            Ok(written) => {
                // Short write: account for the delivered prefix, then treat
                // the sink as broken like any other failure.
                self.shared.buffer.lock().consume(written.min(pending.len()));
                self.sink = None;
                Err(Error::Sink(format!(
                    "short write, sink accepted {written} of {} bytes",
                    pending.len()
                )))
            }
            Err(e) => {
                self.sink = None;
                Err(e)
            }
        }
    }

    /// Best-effort flush of whatever is still buffered at shutdown: at most
    /// one connect attempt if the sink is absent, then flush until the
    /// buffer is empty or the first failure. No backoff here.
    async fn final_drain(&mut self) {
        loop {
            let pending = self.shared.buffer.lock().snapshot();
            if pending.is_empty() {
                return;
            }

            if self.sink.is_none() {
                match self.factory.connect().await {
                    Ok(sink) => self.sink = Some(sink),
                    Err(e) => {
                        warn!(
                            error = %e,
                            dropped = pending.len(),
                            "No sink at shutdown, dropping buffered bytes"
                        );
                        return;
                    }
                }
            }
            let Some(sink) = self.sink.as_mut() else {
                return;
            };

            match sink.write(&pending).await {
                Ok(written) => {
                    self.shared.buffer.lock().consume(written.min(pending.len()));
                    if written < pending.len() {
                        warn!(
                            dropped = pending.len() - written,
                            "Short write at shutdown, dropping remaining bytes"
                        );
                        return;
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        dropped = pending.len(),
                        "Flush failed at shutdown, dropping buffered bytes"
                    );
                    return;
                }
            }
        }
    }
}
