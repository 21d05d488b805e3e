//! catlink-test-harness: scripted serial port for deterministic tests.
//!
//! [`MockPortFactory`] stands in for the real serial backend: it opens
//! [`MockPort`]s whose replies are scripted in advance, and it keeps a
//! shared handle on everything that happened -- bytes written, ports
//! opened and closed -- so tests can make assertions after the session has
//! taken ownership of the port.

mod mock_port;

pub use mock_port::{MockPort, MockPortFactory};
