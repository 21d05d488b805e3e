//! Per-call value objects: [`Command`] and [`Response`].
//!
//! Both are transient values produced once per exchange and never mutated
//! after creation. The codec builds a `Command`, the session consumes it and
//! produces a `Response`, and the dispatcher optionally attaches a decoded
//! value via [`Response::with_value`].

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::types::Operation;

/// Default per-command reply timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Parameter attached to an operation at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A frequency in hertz.
    Hz(u64),
    /// Caller-supplied text, sent verbatim (raw commands).
    Text(String),
}

/// A value decoded from a radio reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyValue {
    /// A frequency in hertz.
    Hz(u64),
    /// An operating mode.
    Mode(crate::types::Mode),
    /// Whether the radio accepted the command frame.
    Accepted(bool),
    /// Reply text that carries no further structure.
    Text(String),
}

/// A fully encoded command, ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The abstract operation this command encodes.
    pub op: Operation,
    /// The parameter the operation was encoded with, if any.
    pub param: Option<ParamValue>,
    /// The concrete bytes to write to the port.
    pub bytes: Vec<u8>,
    /// Expected reply prefix, if the operation has a correlated reply.
    ///
    /// For the ASCII family this is the echoed mnemonic; for the binary
    /// family the preamble plus the swapped address pair. `None` for
    /// fire-and-forget commands.
    pub expect: Option<Vec<u8>>,
    /// How long the session waits for the first reply byte.
    pub timeout: Duration,
}

impl Command {
    /// Build a pass-through command from caller-supplied text.
    pub fn raw(text: &str, timeout: Duration) -> Self {
        Command {
            op: Operation::Raw,
            param: Some(ParamValue::Text(text.to_string())),
            bytes: text.as_bytes().to_vec(),
            expect: None,
            timeout,
        }
    }
}

/// The outcome of one command exchange.
///
/// A `Response` is produced for every completed `execute` call, including
/// ones where the radio stayed silent: `success == false` with an empty
/// payload means the read timeout elapsed, which for many set commands is
/// the normal case. An absent [`value`](Response::value) is likewise a
/// valid, non-error outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Raw bytes drained from the port after the settle delay.
    pub raw: Vec<u8>,
    /// Whether any reply bytes arrived before the deadline.
    pub success: bool,
    /// Parsed value, when the dispatcher could decode one.
    pub value: Option<ReplyValue>,
    /// Failure detail for write errors, absent otherwise.
    pub error: Option<String>,
    /// When the exchange completed.
    pub timestamp: DateTime<Utc>,
    /// Wall-clock duration of the exchange, including gate wait.
    pub elapsed: Duration,
}

impl Response {
    /// A response carrying reply bytes.
    pub fn received(raw: Vec<u8>, elapsed: Duration) -> Self {
        Response {
            success: !raw.is_empty(),
            raw,
            value: None,
            error: None,
            timestamp: Utc::now(),
            elapsed,
        }
    }

    /// A response for an exchange where no bytes arrived in time.
    pub fn timed_out(elapsed: Duration) -> Self {
        Response {
            raw: Vec::new(),
            success: false,
            value: None,
            error: None,
            timestamp: Utc::now(),
            elapsed,
        }
    }

    /// A response for an exchange that failed before a reply could arrive.
    pub fn failed(detail: impl Into<String>, elapsed: Duration) -> Self {
        Response {
            raw: Vec::new(),
            success: false,
            value: None,
            error: Some(detail.into()),
            timestamp: Utc::now(),
            elapsed,
        }
    }

    /// Attach a decoded value, consuming the response.
    pub fn with_value(self, value: Option<ReplyValue>) -> Self {
        Response { value, ..self }
    }
}
