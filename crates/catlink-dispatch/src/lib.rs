//! catlink-dispatch: the operation-level API.
//!
//! [`Dispatcher`] is what the surrounding service layer consumes. For each
//! abstract operation it resolves the encoding through the active radio's
//! capability table, builds a command via the codec, executes it through
//! the gated session, and decodes the reply into a typed result.
//!
//! Failure philosophy, in one place: validation and misuse are rejected
//! synchronously (`OutOfRange`, `Unsupported`, `NotOpen`); everything the
//! radio does or fails to do flows back as data. A silent radio is
//! `Ok(None)` from a get and `Ok(true)` from a set -- these links give no
//! acknowledgment for most set commands, and pretending otherwise would
//! turn every quiet rig into an error storm.

mod dispatcher;

pub use dispatcher::Dispatcher;
