//! The [`RawPort`] trait -- byte-level connection handle.
//!
//! A `RawPort` abstracts over the physical link to a radio. The session
//! crate provides the tokio-serial implementation; the test-harness crate
//! provides a scripted in-memory one. Protocol semantics never reach this
//! layer: a port moves bytes and enforces deadlines, nothing more.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level connection to a radio.
///
/// The session owns its port exclusively and serializes all access through
/// its gate, so implementations do not need internal locking.
#[async_trait]
pub trait RawPort: Send {
    /// Write all of `data` to the link.
    ///
    /// Returns [`Error::Timeout`](crate::error::Error::Timeout) if the write
    /// deadline elapses before the bytes are accepted.
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read available bytes into `buf`, waiting up to `timeout` for the
    /// first byte.
    ///
    /// Returns the number of bytes read, or
    /// [`Error::Timeout`](crate::error::Error::Timeout) if nothing arrived
    /// within the deadline.
    async fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the connection. Subsequent reads and writes fail with
    /// [`Error::NotOpen`](crate::error::Error::NotOpen).
    async fn close(&mut self) -> Result<()>;

    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;
}
