//! catlink-core: Shared types, errors, and port traits for catlink.
//!
//! This crate defines the protocol-agnostic abstractions the rest of the
//! workspace builds on. The codec and session crates depend on these types
//! without pulling in any serial backend or radio table.
//!
//! # Key types
//!
//! - [`Command`] / [`Response`] -- the per-call value objects
//! - [`Operation`] -- the abstract operation vocabulary
//! - [`RawPort`] -- byte-level connection handle
//! - [`Error`] / [`Result`] -- error handling

pub mod command;
pub mod error;
pub mod port;
pub mod types;

// Re-export key types at crate root for ergonomic `use catlink_core::*`.
pub use command::{Command, ParamValue, ReplyValue, Response};
pub use error::{Error, Result};
pub use port::RawPort;
pub use types::{Mode, Operation, ToneMode, Vfo};
