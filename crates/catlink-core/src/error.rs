//! Error types for catlink.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Two failure modes are deliberately
//! *not* errors: a read timeout surfaces as a completed
//! [`Response`](crate::command::Response) with `success == false`, and an
//! unparseable reply surfaces as an absent parsed value. Many radios answer
//! get-commands with silence, so neither condition may abort a call.

/// The error type for all catlink operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level failure: port missing, permission denied, held by
    /// another process, or a serial parameter the backend cannot express.
    ///
    /// Fatal to the `open` attempt that produced it; never retried
    /// internally.
    #[error("transport error: {0}")]
    Transport(String),

    /// A write or read exceeded its deadline.
    ///
    /// Port backends return this from their timed read; the session converts
    /// it into a completed `Response` rather than propagating it.
    #[error("timeout waiting for the radio")]
    Timeout,

    /// Received bytes that violate the wire format in a way that indicates a
    /// configuration problem rather than an unanswered command.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The requested operation has no table entry for the active radio model.
    ///
    /// Distinct from "executed with no effect": callers can tell a radio
    /// that cannot do something from a radio that silently did it.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A parameter failed validation before any I/O was performed.
    #[error("parameter out of range: {0}")]
    OutOfRange(String),

    /// The session is not open.
    #[error("session not open")]
    NotOpen,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
