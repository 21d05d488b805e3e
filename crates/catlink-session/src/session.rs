//! The gated half-duplex session.
//!
//! A [`Session`] owns at most one open port and serializes every use of it
//! through a single `tokio::sync::Mutex`. The link is physically
//! half-duplex: interleaving two exchanges would corrupt both, so the gate
//! is held for the whole write-settle-drain cycle of [`Session::execute`],
//! and `open`/`close` take the same gate. A `close` issued while an
//! exchange is in flight therefore waits for it to finish; it never tears
//! the port out from under a write.
//!
//! There is no retry policy at this layer and no fairness guarantee among
//! blocked callers; first to acquire the gate wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use catlink_core::{Command, Error, RawPort, Response, Result};

use crate::config::SerialSettings;

/// How long follow-up drain reads wait once the first reply bytes arrived.
///
/// The reply is whatever is buffered shortly after the settle delay; this
/// window only absorbs bytes already in flight, so it is much shorter than
/// the first-byte timeout.
const DRAIN_POLL: Duration = Duration::from_millis(20);

/// Read buffer size per drain read. CAT replies are tens of bytes.
const READ_CHUNK: usize = 256;

/// Opens ports for a session.
///
/// Injected at construction time so tests can swap in a scripted port and
/// no component ever consults a process-wide registry.
#[async_trait]
pub trait PortFactory: Send + Sync {
    /// Open a port described by `settings`.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] when the port is missing, busy, inaccessible,
    /// or the settings cannot be expressed by the backend.
    async fn open(&self, settings: &SerialSettings) -> Result<Box<dyn RawPort>>;
}

/// Point-in-time view of a session, for the status surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// Whether a port is currently open.
    pub is_open: bool,
    /// The open port's name, absent when closed.
    pub port_name: Option<String>,
}

struct Inner {
    port: Option<Box<dyn RawPort>>,
    port_name: Option<String>,
    settle_delay: Duration,
    last_activity: Instant,
}

/// A connection to one radio, serialized by a mutual-exclusion gate.
pub struct Session {
    factory: Arc<dyn PortFactory>,
    inner: Mutex<Inner>,
}

impl Session {
    /// Create a closed session that will open ports through `factory`.
    pub fn new(factory: Arc<dyn PortFactory>) -> Self {
        Session {
            factory,
            inner: Mutex::new(Inner {
                port: None,
                port_name: None,
                settle_delay: Duration::from_millis(100),
                last_activity: Instant::now(),
            }),
        }
    }

    /// Open the session on the configured port.
    ///
    /// If a previous port is still open it is closed first, so re-opening
    /// never leaks a descriptor. Takes the gate, and therefore waits for
    /// any in-flight exchange.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] from the factory; the session stays closed.
    pub async fn open(&self, settings: &SerialSettings) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if let Some(mut old) = inner.port.take() {
            debug!(port = ?inner.port_name, "closing previous port before re-open");
            old.close().await?;
            inner.port_name = None;
        }

        let port = self.factory.open(settings).await?;
        inner.port = Some(port);
        inner.port_name = Some(settings.port.clone());
        inner.settle_delay = settings.settle_delay();
        inner.last_activity = Instant::now();
        debug!(port = %settings.port, "session open");
        Ok(())
    }

    /// Close the session. Idempotent; waits for any in-flight exchange.
    pub async fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if let Some(mut port) = inner.port.take() {
            debug!(port = ?inner.port_name, "session closing");
            port.close().await?;
        }
        inner.port_name = None;
        Ok(())
    }

    /// Whether the session currently holds an open port.
    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.port.is_some()
    }

    /// Current open/closed state and port name.
    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;
        SessionStatus {
            is_open: inner.port.is_some(),
            port_name: inner.port_name.clone(),
        }
    }

    /// Execute one command exchange: write, settle, drain.
    ///
    /// The gate is held for the entire exchange. A read timeout with no
    /// reply bytes is a *completed* call -- the returned [`Response`] has
    /// `success == false` and an empty payload -- because many commands are
    /// legitimately unanswered. A write timeout likewise completes with a
    /// failure detail. Only a closed session ([`Error::NotOpen`], checked
    /// before touching the wire) or a hard I/O fault is an error.
    pub async fn execute(&self, command: &Command) -> Result<Response> {
        let started = Instant::now();
        let mut inner = self.inner.lock().await;

        let settle = inner.settle_delay;
        let port = inner.port.as_mut().ok_or(Error::NotOpen)?;

        trace!(op = %command.op, bytes = command.bytes.len(), "executing");

        match port.write(&command.bytes).await {
            Ok(()) => {}
            Err(Error::Timeout) => {
                return Ok(Response::failed("write timed out", started.elapsed()));
            }
            Err(e) => return Err(e),
        }

        // Let the radio turn the line around before draining the reply.
        tokio::time::sleep(settle).await;

        let mut raw = Vec::new();
        let mut buf = [0u8; READ_CHUNK];
        match port.read(&mut buf, command.timeout).await {
            Ok(n) => {
                raw.extend_from_slice(&buf[..n]);
                // Absorb whatever else is already buffered.
                while let Ok(n) = port.read(&mut buf, DRAIN_POLL).await {
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                }
            }
            Err(Error::Timeout) => {
                inner.last_activity = Instant::now();
                trace!(op = %command.op, "no reply before deadline");
                return Ok(Response::timed_out(started.elapsed()));
            }
            Err(e) => return Err(e),
        }

        inner.last_activity = Instant::now();
        trace!(op = %command.op, reply_bytes = raw.len(), "exchange complete");
        Ok(Response::received(raw, started.elapsed()))
    }

    /// Instant of the last completed exchange or open.
    pub async fn last_activity(&self) -> Instant {
        self.inner.lock().await.last_activity
    }
}
