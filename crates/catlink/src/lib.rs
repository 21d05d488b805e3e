//! # catlink -- CAT transceiver control over serial links
//!
//! `catlink` is an asynchronous Rust library for commanding amateur radio
//! transceivers over a serial link: set and read frequency, toggle PTT,
//! change modes, and the rest of the CAT operation surface, with the
//! half-duplex link correctness handled for you.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use catlink::{Dispatcher, SerialPortFactory, SerialSettings, Vfo};
//! use catlink::models::ft818;
//!
//! #[tokio::main]
//! async fn main() -> catlink::Result<()> {
//!     let radio = Dispatcher::new(ft818(), Arc::new(SerialPortFactory));
//!     radio.open(&SerialSettings::for_port("/dev/ttyUSB0")).await?;
//!
//!     radio.set_frequency(Vfo::A, 14_074_000).await?;
//!     if let Some(hz) = radio.get_frequency(Vfo::A).await? {
//!         println!("VFO-A: {hz} Hz");
//!     }
//!
//!     radio.close().await
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                  | Purpose                                      |
//! |------------------------|----------------------------------------------|
//! | `catlink-core`         | Types, errors, the [`RawPort`] trait         |
//! | `catlink-proto`        | Capability tables and wire codecs            |
//! | `catlink-session`      | Gated serial session and configuration       |
//! | `catlink-dispatch`     | The [`Dispatcher`] façade                    |
//! | `catlink-test-harness` | Scripted mock port for tests                 |
//! | **`catlink`**          | This facade crate -- re-exports everything   |
//!
//! ## Protocol families
//!
//! Two wire families are supported and selected per radio model:
//! semicolon-terminated ASCII mnemonics (e.g. `FA00014074000;`) and binary
//! addressed frames (`FE FE <dst> <src> ... FD`). Registering a new radio
//! means registering a new capability table -- see
//! [`models::supported_models`].
//!
//! ## Failure model
//!
//! Bad parameters and calls on a closed session fail fast; everything the
//! radio does flows back as data. A silent radio yields an absent value,
//! not an error -- most set commands on these links are unacknowledged by
//! design.

pub use catlink_core::{
    Command, Error, Mode, Operation, ParamValue, RawPort, ReplyValue, Response, Result, ToneMode,
    Vfo,
};
pub use catlink_dispatch::Dispatcher;
pub use catlink_session::{
    available_ports, BaudRate, DataBits, FlowControl, Parity, PortFactory, SerialPortFactory,
    SerialSettings, Session, SessionStatus, StopBits,
};

/// Radio capability tables and codec internals.
pub mod models {
    pub use catlink_proto::{ft818, ic7300, supported_models, ProtocolFamily, RadioModel, Template};
}

/// Wire codec building blocks, for callers assembling custom commands.
pub mod proto {
    pub use catlink_proto::{ascii, civ, codec};
}
