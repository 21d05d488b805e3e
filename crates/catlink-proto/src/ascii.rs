//! ASCII mnemonic-suffix codec.
//!
//! The text protocol family uses semicolon-terminated ASCII commands over
//! the serial link. A set command is a two-letter mnemonic followed by a
//! fixed-width field; a get command is the mnemonic alone; a reply mirrors
//! the set form:
//!
//! ```text
//! FA00014074000;     set VFO-A to 14.074 MHz (11-digit zero-padded hertz)
//! FA;                read VFO-A frequency
//! FA00014074000;     the reply
//! ```
//!
//! Decoding is deliberately forgiving. The session reads with a
//! settle-then-drain strategy, so a buffer may hold a partial reply, two
//! merged replies, or line noise. Decoders scan the `;`-separated segments
//! for the expected mnemonic and yield `None` on any mismatch -- silence and
//! garbage are ordinary outcomes here, not errors.

use bytes::{BufMut, BytesMut};

use catlink_core::{Error, Result};

/// Command/reply terminator byte.
pub const TERMINATOR: u8 = b';';

/// Reply sent for an unrecognised or invalid command: `?;`.
pub const ERROR_REPLY: &[u8] = b"?;";

/// Highest frequency the text family can express, in hertz.
pub const MAX_FREQUENCY_HZ: u64 = 999_999_999_999;

/// Assemble a command from a mnemonic and a field.
///
/// An empty field produces the get form.
///
/// # Example
///
/// ```
/// use catlink_proto::ascii::encode_command;
///
/// assert_eq!(encode_command("FA", ""), b"FA;");
/// assert_eq!(encode_command("TX", "08"), b"TX08;");
/// ```
pub fn encode_command(mnemonic: &str, field: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(mnemonic.len() + field.len() + 1);
    buf.put_slice(mnemonic.as_bytes());
    buf.put_slice(field.as_bytes());
    buf.put_u8(TERMINATOR);
    buf.to_vec()
}

/// Assemble a set-frequency command with a zero-padded hertz field.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when `hz` exceeds [`MAX_FREQUENCY_HZ`].
/// Validation happens here, before any transport interaction.
pub fn encode_frequency(mnemonic: &str, hz: u64, width: usize) -> Result<Vec<u8>> {
    if hz > MAX_FREQUENCY_HZ {
        return Err(Error::OutOfRange(format!("frequency {hz} Hz")));
    }
    Ok(encode_command(mnemonic, &format!("{hz:0width$}")))
}

/// Extract the field of the first complete reply segment matching `mnemonic`.
///
/// Splits the drained buffer at `;` and returns the text between the
/// mnemonic and the terminator of the first matching segment. Unterminated
/// trailing data is ignored, as are segments for other mnemonics -- a merged
/// buffer like `MD04;FA00014074000;` still resolves `FA` correctly.
///
/// Returns `None` when no segment matches or the buffer is not ASCII.
pub fn reply_field<'a>(raw: &'a [u8], mnemonic: &str) -> Option<&'a str> {
    let mut rest = raw;
    loop {
        let term = rest.iter().position(|&b| b == TERMINATOR)?;
        let segment = &rest[..term];
        if let Ok(text) = std::str::from_utf8(segment) {
            if let Some(field) = text.strip_prefix(mnemonic) {
                return Some(field);
            }
        }
        rest = &rest[term + 1..];
    }
}

/// Decode a frequency reply.
///
/// Strips the mnemonic prefix and the trailing `;`, then parses the
/// remaining digits as hertz. Any mismatch -- wrong prefix, missing
/// terminator, non-digit characters, empty field -- yields `None`.
///
/// # Example
///
/// ```
/// use catlink_proto::ascii::decode_frequency;
///
/// assert_eq!(decode_frequency(b"FA00014074000;", "FA"), Some(14_074_000));
/// assert_eq!(decode_frequency(b"XY123;", "FA"), None);
/// ```
pub fn decode_frequency(raw: &[u8], mnemonic: &str) -> Option<u64> {
    let field = reply_field(raw, mnemonic)?;
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Whether the drained buffer contains the `?;` error reply.
pub fn is_error_reply(raw: &[u8]) -> bool {
    reply_field(raw, "?").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Encoding
    // ---------------------------------------------------------------

    #[test]
    fn encode_get_form() {
        assert_eq!(encode_command("FA", ""), b"FA;");
        assert_eq!(encode_command("MD", ""), b"MD;");
    }

    #[test]
    fn encode_set_form() {
        assert_eq!(encode_command("TX", "08"), b"TX08;");
        assert_eq!(encode_command("PS", "8F"), b"PS8F;");
    }

    #[test]
    fn encode_frequency_zero_padded() {
        assert_eq!(
            encode_frequency("FA", 14_074_000, 11).unwrap(),
            b"FA00014074000;"
        );
        assert_eq!(encode_frequency("FB", 0, 11).unwrap(), b"FB00000000000;");
        assert_eq!(encode_frequency("FA", 1, 11).unwrap(), b"FA00000000001;");
    }

    #[test]
    fn encode_frequency_at_limit() {
        assert_eq!(
            encode_frequency("FA", MAX_FREQUENCY_HZ, 11).unwrap(),
            b"FA999999999999;"
        );
    }

    #[test]
    fn encode_frequency_rejects_beyond_limit() {
        let err = encode_frequency("FA", MAX_FREQUENCY_HZ + 1, 11).unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
    }

    // ---------------------------------------------------------------
    // Decoding
    // ---------------------------------------------------------------

    #[test]
    fn decode_frequency_reply() {
        assert_eq!(decode_frequency(b"FA00014074000;", "FA"), Some(14_074_000));
    }

    #[test]
    fn decode_frequency_b_reply() {
        assert_eq!(decode_frequency(b"FB00007000000;", "FB"), Some(7_000_000));
    }

    #[test]
    fn decode_frequency_zero() {
        assert_eq!(decode_frequency(b"FA00000000000;", "FA"), Some(0));
    }

    #[test]
    fn decode_frequency_twelve_digits() {
        assert_eq!(
            decode_frequency(b"FA999999999999;", "FA"),
            Some(999_999_999_999)
        );
    }

    #[test]
    fn decode_wrong_mnemonic_is_absent() {
        assert_eq!(decode_frequency(b"XY123;", "FA"), None);
    }

    #[test]
    fn decode_missing_terminator_is_absent() {
        assert_eq!(decode_frequency(b"FA00014074000", "FA"), None);
    }

    #[test]
    fn decode_non_digit_field_is_absent() {
        assert_eq!(decode_frequency(b"FA0001407400Z;", "FA"), None);
    }

    #[test]
    fn decode_empty_buffer_is_absent() {
        assert_eq!(decode_frequency(b"", "FA"), None);
    }

    #[test]
    fn decode_empty_field_is_absent() {
        assert_eq!(decode_frequency(b"FA;", "FA"), None);
    }

    #[test]
    fn decode_tolerates_merged_replies() {
        assert_eq!(
            decode_frequency(b"MD04;FA00014074000;", "FA"),
            Some(14_074_000)
        );
    }

    #[test]
    fn decode_tolerates_trailing_partial_reply() {
        assert_eq!(
            decode_frequency(b"FA00014074000;FB0001", "FA"),
            Some(14_074_000)
        );
    }

    #[test]
    fn decode_tolerates_leading_noise() {
        assert_eq!(
            decode_frequency(b"\x00\xffzz;FA00014074000;", "FA"),
            Some(14_074_000)
        );
    }

    #[test]
    fn reply_field_first_match_wins() {
        assert_eq!(reply_field(b"FA111;FA222;", "FA"), Some("111"));
    }

    #[test]
    fn error_reply_detection() {
        assert!(is_error_reply(b"?;"));
        assert!(is_error_reply(b"FA00014074000;?;"));
        assert!(!is_error_reply(b"FA00014074000;"));
        assert!(!is_error_reply(b""));
    }

    // ---------------------------------------------------------------
    // Round trip
    // ---------------------------------------------------------------

    #[test]
    fn round_trip_boundary_values() {
        for hz in [0u64, 1, 14_074_000, 999_999_999_999] {
            let wire = encode_frequency("FA", hz, 11).unwrap();
            assert_eq!(decode_frequency(&wire, "FA"), Some(hz), "hz = {hz}");
        }
    }
}
