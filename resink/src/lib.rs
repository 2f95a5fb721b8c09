//! A resilient buffered writer: decouples producers emitting bytes from a
//! downstream sink that may be slow, unreliable, or in need of periodic
//! re-establishment.
//!
//! Producers call [`ReplayWriter::write`] which appends into a bounded
//! in-memory buffer and never blocks on sink I/O. A single background drain
//! task flushes buffered bytes to the current [`Sink`]; whenever a flush
//! fails (hard error or short write) the sink is discarded and the
//! caller-supplied [`SinkFactory`] is asked for a replacement, with
//! exponential backoff between failed attempts. Bytes that a broken sink did
//! not accept stay buffered and are replayed, in order, to the replacement.
//!
//! The only error a producer ever sees while the writer is running is
//! [`Error::BufferFull`]; sink and connect failures are handled internally
//! and surface to producers only as rising buffer occupancy.

mod buffer;
mod config;
mod error;
mod sink;
mod writer;

pub use config::RetryConfig;
pub use error::{Error, Result};
pub use sink::{AsyncWriteSink, BlackholeSink, Sink, SinkFactory};
pub use writer::{ReplayWriter, ReplayWriterBuilder};
