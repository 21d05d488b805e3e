//! Stateless translation between abstract operations and wire bytes.
//!
//! [`encode`] resolves an operation through a model's capability table and
//! produces a ready-to-send [`Command`]; [`decode`] turns a drained reply
//! buffer back into a typed [`ReplyValue`]. Both are pure functions
//! parameterized by the active [`RadioModel`] -- the codec holds no state
//! and performs no I/O.
//!
//! Decode never fails: an unanswered or garbled reply is `None`, because
//! silence is an ordinary outcome on these links. Validation failures
//! (frequency out of range, missing parameter) happen in [`encode`], before
//! any transport interaction.

use std::time::Duration;

use catlink_core::{Command, Error, Mode, Operation, ParamValue, ReplyValue, Result};

use crate::ascii;
use crate::civ;
use crate::model::{ProtocolFamily, RadioModel, Template, ALL_MODES};

/// Encode an operation into a [`Command`] for the given model.
///
/// `param` is required for frequency sets ([`ParamValue::Hz`]) and ignored
/// elsewhere. `timeout` becomes the command's reply deadline.
///
/// # Errors
///
/// - [`Error::Unsupported`] when the model's table has no entry for `op`
/// - [`Error::OutOfRange`] when a frequency parameter exceeds the family
///   limit (checked here, with zero bytes written)
/// - [`Error::Protocol`] when a required parameter is missing
pub fn encode(
    model: &RadioModel,
    op: Operation,
    param: Option<&ParamValue>,
    timeout: Duration,
) -> Result<Command> {
    let template = model.lookup(op)?;

    let (bytes, expect) = match template {
        Template::AsciiSet { mnemonic, field } => (
            ascii::encode_command(mnemonic, field),
            Some(mnemonic.as_bytes().to_vec()),
        ),
        Template::AsciiGet { mnemonic } => (
            ascii::encode_command(mnemonic, ""),
            Some(mnemonic.as_bytes().to_vec()),
        ),
        Template::AsciiSetFrequency { mnemonic } => {
            let hz = require_hz(op, param)?;
            (
                ascii::encode_frequency(mnemonic, hz, model.pad_width)?,
                Some(mnemonic.as_bytes().to_vec()),
            )
        }
        Template::CivSet { cmd, sub, data } => {
            let (address, controller) = civ_addresses(model)?;
            (
                civ::encode_frame(address, controller, cmd, sub, data),
                Some(vec![civ::PREAMBLE, civ::PREAMBLE, controller, address]),
            )
        }
        Template::CivGet { cmd, sub } => {
            let (address, controller) = civ_addresses(model)?;
            (
                civ::encode_frame(address, controller, cmd, sub, &[]),
                Some(vec![civ::PREAMBLE, civ::PREAMBLE, controller, address]),
            )
        }
        Template::CivSetFrequency { cmd, sub } => {
            let (address, controller) = civ_addresses(model)?;
            let hz = require_hz(op, param)?;
            let bcd = civ::freq_to_bcd(hz)?;
            (
                civ::encode_frame(address, controller, cmd, sub, &bcd),
                Some(vec![civ::PREAMBLE, civ::PREAMBLE, controller, address]),
            )
        }
    };

    Ok(Command {
        op,
        param: param.cloned(),
        bytes,
        expect,
        timeout,
    })
}

/// Decode a drained reply buffer for an operation.
///
/// Returns `None` whenever the buffer does not contain a reply matching the
/// operation's template -- wrong mnemonic, unswapped addresses, bad digits,
/// or plain silence. This is a valid outcome, never an error.
pub fn decode(model: &RadioModel, op: Operation, raw: &[u8]) -> Option<ReplyValue> {
    match model.family {
        ProtocolFamily::Ascii => decode_ascii(model, op, raw),
        ProtocolFamily::CivBinary {
            address,
            controller,
        } => decode_civ(model, op, raw, address, controller),
    }
}

fn decode_ascii(model: &RadioModel, op: Operation, raw: &[u8]) -> Option<ReplyValue> {
    match (op, model.lookup(op).ok()?) {
        (Operation::GetFrequency(_), Template::AsciiGet { mnemonic }) => {
            ascii::decode_frequency(raw, mnemonic).map(ReplyValue::Hz)
        }
        (Operation::GetMode, Template::AsciiGet { mnemonic }) => {
            let field = ascii::reply_field(raw, mnemonic)?;
            ascii_mode_from_code(model, field).map(ReplyValue::Mode)
        }
        // Set commands: an explicit error reply is a rejection; an echo or
        // silence is acceptance. Timeout-with-no-bytes is judged by the
        // caller from the response's success flag.
        _ => Some(ReplyValue::Accepted(!ascii::is_error_reply(raw))),
    }
}

fn decode_civ(
    model: &RadioModel,
    op: Operation,
    raw: &[u8],
    address: u8,
    controller: u8,
) -> Option<ReplyValue> {
    let reply = civ::match_reply(raw, address, controller)?;
    match op {
        Operation::GetFrequency(_) => {
            // Reply echoes cmd + sub before the 5 BCD bytes.
            let template = model.lookup(op).ok()?;
            let Template::CivGet { cmd, sub } = template else {
                return None;
            };
            if reply.cmd != cmd {
                return None;
            }
            let data = match sub {
                Some(expected) => {
                    let (&echoed, rest) = reply.data.split_first()?;
                    if echoed != expected {
                        return None;
                    }
                    rest
                }
                None => &reply.data[..],
            };
            civ::bcd_to_freq(data).map(ReplyValue::Hz)
        }
        Operation::GetMode => {
            let Ok(Template::CivGet { cmd, .. }) = model.lookup(op) else {
                return None;
            };
            if reply.cmd != cmd {
                return None;
            }
            let (&mode_byte, rest) = reply.data.split_first()?;
            let filter = rest.first().copied().unwrap_or(0x01);
            civ_mode_from_bytes(model, mode_byte, filter).map(ReplyValue::Mode)
        }
        _ => Some(ReplyValue::Accepted(!reply.is_ng())),
    }
}

/// Map an ASCII mode field back to a [`Mode`] via the model's own table.
fn ascii_mode_from_code(model: &RadioModel, code: &str) -> Option<Mode> {
    ALL_MODES.iter().copied().find(|mode| {
        matches!(
            model.lookup(Operation::SetMode(*mode)),
            Ok(Template::AsciiSet { field, .. }) if field == code
        )
    })
}

/// Map a binary mode/filter byte pair back to a [`Mode`] via the table.
fn civ_mode_from_bytes(model: &RadioModel, mode_byte: u8, filter: u8) -> Option<Mode> {
    ALL_MODES.iter().copied().find(|mode| {
        matches!(
            model.lookup(Operation::SetMode(*mode)),
            Ok(Template::CivSet { data, .. }) if data == [mode_byte, filter]
        )
    })
}

fn require_hz(op: Operation, param: Option<&ParamValue>) -> Result<u64> {
    match param {
        Some(ParamValue::Hz(hz)) => Ok(*hz),
        _ => Err(Error::Protocol(format!("{op} requires a frequency parameter"))),
    }
}

fn civ_addresses(model: &RadioModel) -> Result<(u8, u8)> {
    match model.family {
        ProtocolFamily::CivBinary {
            address,
            controller,
        } => Ok((address, controller)),
        ProtocolFamily::Ascii => Err(Error::Protocol(format!(
            "binary template on text-family model {}",
            model.model
        ))),
    }
}
