//! catlink-proto: Radio capability tables and wire codecs.
//!
//! Two protocol families are implemented:
//!
//! - [`ascii`] -- semicolon-terminated mnemonic commands (Yaesu-style CAT)
//! - [`civ`] -- binary addressed frames (Icom CI-V style)
//!
//! [`model`] holds the data-driven capability tables that map abstract
//! [`Operation`](catlink_core::Operation)s onto family-specific encoding
//! templates, and [`codec`] is the stateless translation layer between the
//! two: it turns an operation plus parameter into a ready-to-send
//! [`Command`](catlink_core::Command) and a drained reply buffer back into a
//! typed value.
//!
//! Everything in this crate is pure; no I/O happens here.

pub mod ascii;
pub mod civ;
pub mod codec;
pub mod model;

pub use codec::{decode, encode};
pub use model::{ft818, ic7300, supported_models, ProtocolFamily, RadioModel, Template};
