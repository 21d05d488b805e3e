//! catlink-session: the transport session.
//!
//! Owns the single physical connection to a radio and guarantees
//! correctness of the half-duplex link under concurrent callers: every
//! command exchange -- write, settle delay, drain -- happens under one
//! mutual-exclusion gate, and `open`/`close` take the same gate so they can
//! never interleave with an in-flight exchange.
//!
//! This crate knows nothing about protocol semantics. It moves the bytes of
//! a pre-encoded [`Command`](catlink_core::Command) and returns whatever the
//! radio sent back as a [`Response`](catlink_core::Response).

pub mod config;
pub mod serial;
pub mod session;

pub use config::{BaudRate, DataBits, FlowControl, Parity, SerialSettings, StopBits};
pub use serial::{available_ports, SerialPortFactory};
pub use session::{PortFactory, Session, SessionStatus};
