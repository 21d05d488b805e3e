//! Mock port implementation.
//!
//! The mock mirrors the settle-then-drain behavior of the real link: a
//! write arms the next scripted reply, a read consumes it, and any further
//! read times out. A port with no scripted reply behaves exactly like a
//! serial port with no radio attached -- every read times out.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use catlink_core::{Error, RawPort, Result};
use catlink_session::{PortFactory, SerialSettings};

#[derive(Debug, Default)]
struct LinkState {
    /// Every byte sequence written, one entry per write call.
    writes: Vec<Vec<u8>>,
    /// Scripted replies, consumed one per write.
    replies: VecDeque<Vec<u8>>,
    /// Reply armed by the most recent write, if any.
    pending: Option<Vec<u8>>,
    /// Whether the current port is open.
    open: bool,
    /// Number of ports handed out by the factory.
    opens: usize,
    /// Number of close calls observed.
    closes: usize,
    /// When set, the next factory open fails with a transport error.
    fail_next_open: bool,
}

/// A scripted in-memory serial port.
///
/// Created by [`MockPortFactory::open`]; tests normally interact with the
/// factory handle rather than the port itself.
pub struct MockPort {
    state: Arc<Mutex<LinkState>>,
}

#[async_trait]
impl RawPort for MockPort {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return Err(Error::NotOpen);
        }
        state.writes.push(data.to_vec());
        state.pending = state.replies.pop_front();
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            if !state.open {
                return Err(Error::NotOpen);
            }
            state.pending.take()
        };
        match reply {
            Some(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            None => {
                // Behave like an empty line: nothing arrives, the deadline
                // elapses. Sleeping the full timeout keeps timing-sensitive
                // tests honest.
                tokio::time::sleep(timeout).await;
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.open {
            state.open = false;
            state.closes += 1;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }
}

/// Factory and inspection handle for [`MockPort`]s.
///
/// Clones share state, so a test can keep one handle while the session owns
/// the port the factory produced.
#[derive(Clone, Default)]
pub struct MockPortFactory {
    state: Arc<Mutex<LinkState>>,
}

impl MockPortFactory {
    /// Create a factory with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply armed by the next unanswered write.
    pub fn enqueue_reply(&self, bytes: &[u8]) {
        self.state.lock().unwrap().replies.push_back(bytes.to_vec());
    }

    /// Make the next `open` fail with a transport error.
    pub fn fail_next_open(&self) {
        self.state.lock().unwrap().fail_next_open = true;
    }

    /// All bytes written so far, one entry per write call.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Number of write calls observed.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes.len()
    }

    /// Number of ports opened through this factory.
    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opens
    }

    /// Number of port close calls observed.
    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closes
    }
}

#[async_trait]
impl PortFactory for MockPortFactory {
    async fn open(&self, settings: &SerialSettings) -> Result<Box<dyn RawPort>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_open {
            state.fail_next_open = false;
            return Err(Error::Transport(format!(
                "failed to open {}: no such port",
                settings.port
            )));
        }
        state.opens += 1;
        state.open = true;
        Ok(Box::new(MockPort {
            state: self.state.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_arms_the_scripted_reply() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"FA00014074000;");
        let mut port = factory
            .open(&SerialSettings::for_port("mock"))
            .await
            .unwrap();

        port.write(b"FA;").await.unwrap();
        let mut buf = [0u8; 64];
        let n = port.read(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"FA00014074000;");
        assert_eq!(factory.writes(), vec![b"FA;".to_vec()]);
    }

    #[tokio::test]
    async fn read_without_reply_times_out() {
        let factory = MockPortFactory::new();
        let mut port = factory
            .open(&SerialSettings::for_port("mock"))
            .await
            .unwrap();

        port.write(b"FA;").await.unwrap();
        let mut buf = [0u8; 64];
        let err = port
            .read(&mut buf, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[tokio::test]
    async fn one_reply_per_write() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"R1;");
        factory.enqueue_reply(b"R2;");
        let mut port = factory
            .open(&SerialSettings::for_port("mock"))
            .await
            .unwrap();
        let mut buf = [0u8; 64];

        port.write(b"A;").await.unwrap();
        let n = port.read(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"R1;");
        // Drained: the second scripted reply is not served until armed.
        assert!(port.read(&mut buf, Duration::from_millis(10)).await.is_err());

        port.write(b"B;").await.unwrap();
        let n = port.read(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"R2;");
    }

    #[tokio::test]
    async fn closed_port_rejects_io() {
        let factory = MockPortFactory::new();
        let mut port = factory
            .open(&SerialSettings::for_port("mock"))
            .await
            .unwrap();
        port.close().await.unwrap();

        assert!(!port.is_open());
        assert!(matches!(
            port.write(b"FA;").await.unwrap_err(),
            Error::NotOpen
        ));
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test]
    async fn fail_next_open_is_one_shot() {
        let factory = MockPortFactory::new();
        factory.fail_next_open();
        let err = factory
            .open(&SerialSettings::for_port("mock"))
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(factory.open(&SerialSettings::for_port("mock")).await.is_ok());
        assert_eq!(factory.opened(), 1);
    }
}
