//! Radio capability tables.
//!
//! Each supported radio is described by a [`RadioModel`]: its identity, its
//! protocol family, and a table mapping abstract
//! [`Operation`](catlink_core::Operation)s to encoding [`Template`]s.
//! Adding a radio means registering a new table -- there is no base type to
//! subclass, and an operation missing from a table is reported as
//! [`Error::Unsupported`](catlink_core::Error::Unsupported) rather than
//! silently ignored.

use std::collections::HashMap;

use catlink_core::{Error, Mode, Operation, Result, ToneMode, Vfo};

/// The wire protocol family a radio speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFamily {
    /// Semicolon-terminated ASCII mnemonic commands.
    Ascii,
    /// Binary addressed frames with a preamble and terminator.
    CivBinary {
        /// Bus address of the radio.
        address: u8,
        /// Bus address of the controller (conventionally `0xE0`).
        controller: u8,
    },
}

/// How one operation is put on the wire.
///
/// Templates are pure data; the codec interprets them. The ASCII variants
/// carry mnemonics and fixed fields, the binary variants command and
/// sub-command bytes. Frequency templates leave the value field open for
/// the parameter supplied at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// ASCII set: `<mnemonic><field>;`.
    AsciiSet {
        mnemonic: &'static str,
        field: &'static str,
    },
    /// ASCII get: `<mnemonic>;`, reply mirrors the set form.
    AsciiGet { mnemonic: &'static str },
    /// ASCII set-frequency: `<mnemonic><zero-padded hertz>;`.
    AsciiSetFrequency { mnemonic: &'static str },
    /// Binary set: fixed command/sub-command/data frame.
    CivSet {
        cmd: u8,
        sub: Option<u8>,
        data: &'static [u8],
    },
    /// Binary get: command/sub-command frame with no data.
    CivGet { cmd: u8, sub: Option<u8> },
    /// Binary set-frequency: command/sub-command frame with BCD data.
    CivSetFrequency { cmd: u8, sub: Option<u8> },
}

impl Template {
    /// Whether the template has a non-empty encoding.
    fn is_empty(&self) -> bool {
        match self {
            Template::AsciiSet { mnemonic, .. }
            | Template::AsciiGet { mnemonic }
            | Template::AsciiSetFrequency { mnemonic } => mnemonic.is_empty(),
            // Binary templates always carry a command byte.
            Template::CivSet { .. } | Template::CivGet { .. } | Template::CivSetFrequency { .. } => {
                false
            }
        }
    }
}

/// A radio model: identity, protocol family, and its operation table.
#[derive(Debug, Clone)]
pub struct RadioModel {
    /// Manufacturer name (e.g. "Yaesu").
    pub manufacturer: &'static str,
    /// Model name (e.g. "FT-818").
    pub model: &'static str,
    /// The protocol family this model speaks.
    pub family: ProtocolFamily,
    /// Width of the frequency field: digits for ASCII, BCD bytes for binary.
    pub pad_width: usize,
    table: HashMap<Operation, Template>,
}

impl RadioModel {
    /// Resolve the encoding template for an operation.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when this model has no entry for `op`. Callers
    /// can rely on this to distinguish "not implemented for this radio" from
    /// "executed with no effect".
    pub fn lookup(&self, op: Operation) -> Result<Template> {
        self.table
            .get(&op)
            .copied()
            .ok_or_else(|| Error::Unsupported(format!("{op} on {}", self.model)))
    }

    /// Number of operations in the table.
    pub fn operation_count(&self) -> usize {
        self.table.len()
    }

    /// Iterate over the table entries.
    pub fn operations(&self) -> impl Iterator<Item = (&Operation, &Template)> {
        self.table.iter()
    }

    /// Check the table invariants: every template non-empty.
    ///
    /// Key uniqueness is structural (the table is a map), so only template
    /// contents need runtime validation.
    pub fn validate(&self) -> Result<()> {
        for (op, template) in &self.table {
            if template.is_empty() {
                return Err(Error::Protocol(format!(
                    "empty template for {op} on {}",
                    self.model
                )));
            }
        }
        Ok(())
    }
}

/// All eight operating modes, for table construction and tests.
pub(crate) const ALL_MODES: [Mode; 8] = [
    Mode::LSB,
    Mode::USB,
    Mode::CW,
    Mode::CWR,
    Mode::AM,
    Mode::FM,
    Mode::DIG,
    Mode::PKT,
];

/// Yaesu FT-818 (text family).
///
/// The payload fields are the FT-818 command constants: each on/off pair is
/// a distinct opcode rather than a shared opcode with a state argument, and
/// the mode and tone codes are the values the radio's command set defines
/// (LSB `00`, USB `01`, ... PKT `0C`; DCS `0A`, CTCSS `2A`, encoder `4A`,
/// off `8A`).
pub fn ft818() -> RadioModel {
    let mut table = HashMap::new();

    table.insert(Operation::PowerOn, Template::AsciiSet { mnemonic: "PS", field: "0F" });
    table.insert(Operation::PowerOff, Template::AsciiSet { mnemonic: "PS", field: "8F" });
    table.insert(Operation::PttOn, Template::AsciiSet { mnemonic: "TX", field: "08" });
    table.insert(Operation::PttOff, Template::AsciiSet { mnemonic: "TX", field: "88" });
    table.insert(Operation::LockOn, Template::AsciiSet { mnemonic: "LK", field: "00" });
    table.insert(Operation::LockOff, Template::AsciiSet { mnemonic: "LK", field: "80" });
    table.insert(Operation::ClarifierOn, Template::AsciiSet { mnemonic: "RT", field: "05" });
    table.insert(Operation::ClarifierOff, Template::AsciiSet { mnemonic: "RT", field: "85" });
    table.insert(Operation::SplitOn, Template::AsciiSet { mnemonic: "FT", field: "02" });
    table.insert(Operation::SplitOff, Template::AsciiSet { mnemonic: "FT", field: "82" });

    table.insert(
        Operation::SetTone(ToneMode::Dcs),
        Template::AsciiSet { mnemonic: "CT", field: "0A" },
    );
    table.insert(
        Operation::SetTone(ToneMode::Ctcss),
        Template::AsciiSet { mnemonic: "CT", field: "2A" },
    );
    table.insert(
        Operation::SetTone(ToneMode::Encoder),
        Template::AsciiSet { mnemonic: "CT", field: "4A" },
    );
    table.insert(
        Operation::SetTone(ToneMode::Off),
        Template::AsciiSet { mnemonic: "CT", field: "8A" },
    );

    table.insert(Operation::ToggleVfo, Template::AsciiSet { mnemonic: "VS", field: "81" });

    for (mode, code) in [
        (Mode::LSB, "00"),
        (Mode::USB, "01"),
        (Mode::CW, "02"),
        (Mode::CWR, "03"),
        (Mode::AM, "04"),
        (Mode::FM, "08"),
        (Mode::DIG, "0A"),
        (Mode::PKT, "0C"),
    ] {
        table.insert(
            Operation::SetMode(mode),
            Template::AsciiSet { mnemonic: "MD", field: code },
        );
    }
    table.insert(Operation::GetMode, Template::AsciiGet { mnemonic: "MD" });

    table.insert(
        Operation::GetFrequency(Vfo::A),
        Template::AsciiGet { mnemonic: "FA" },
    );
    table.insert(
        Operation::GetFrequency(Vfo::B),
        Template::AsciiGet { mnemonic: "FB" },
    );
    table.insert(
        Operation::SetFrequency(Vfo::A),
        Template::AsciiSetFrequency { mnemonic: "FA" },
    );
    table.insert(
        Operation::SetFrequency(Vfo::B),
        Template::AsciiSetFrequency { mnemonic: "FB" },
    );

    RadioModel {
        manufacturer: "Yaesu",
        model: "FT-818",
        family: ProtocolFamily::Ascii,
        pad_width: 11,
        table,
    }
}

/// Icom IC-7300 (binary family, bus address `0x94`).
///
/// Command bytes: power 0x18, PTT 0x1C/0x00, split 0x0F, function toggles
/// 0x16 (dial lock 0x32, repeater tone 0x42, tone squelch 0x43, DTCS 0x4B),
/// VFO exchange 0x07/0xB0, mode set/read 0x06/0x04, and the
/// selected/unselected-VFO frequency command 0x25, which addresses VFO A
/// (sub 0x00) and VFO B (sub 0x01) independently.
pub fn ic7300() -> RadioModel {
    let mut table = HashMap::new();

    table.insert(
        Operation::PowerOn,
        Template::CivSet { cmd: 0x18, sub: Some(0x01), data: &[] },
    );
    table.insert(
        Operation::PowerOff,
        Template::CivSet { cmd: 0x18, sub: Some(0x00), data: &[] },
    );
    table.insert(
        Operation::PttOn,
        Template::CivSet { cmd: 0x1C, sub: Some(0x00), data: &[0x01] },
    );
    table.insert(
        Operation::PttOff,
        Template::CivSet { cmd: 0x1C, sub: Some(0x00), data: &[0x00] },
    );
    table.insert(
        Operation::LockOn,
        Template::CivSet { cmd: 0x16, sub: Some(0x32), data: &[0x01] },
    );
    table.insert(
        Operation::LockOff,
        Template::CivSet { cmd: 0x16, sub: Some(0x32), data: &[0x00] },
    );
    table.insert(
        Operation::ClarifierOn,
        Template::CivSet { cmd: 0x21, sub: Some(0x01), data: &[0x01] },
    );
    table.insert(
        Operation::ClarifierOff,
        Template::CivSet { cmd: 0x21, sub: Some(0x01), data: &[0x00] },
    );
    table.insert(
        Operation::SplitOn,
        Template::CivSet { cmd: 0x0F, sub: Some(0x01), data: &[] },
    );
    table.insert(
        Operation::SplitOff,
        Template::CivSet { cmd: 0x0F, sub: Some(0x00), data: &[] },
    );

    table.insert(
        Operation::SetTone(ToneMode::Encoder),
        Template::CivSet { cmd: 0x16, sub: Some(0x42), data: &[0x01] },
    );
    table.insert(
        Operation::SetTone(ToneMode::Ctcss),
        Template::CivSet { cmd: 0x16, sub: Some(0x43), data: &[0x01] },
    );
    table.insert(
        Operation::SetTone(ToneMode::Dcs),
        Template::CivSet { cmd: 0x16, sub: Some(0x4B), data: &[0x01] },
    );
    table.insert(
        Operation::SetTone(ToneMode::Off),
        Template::CivSet { cmd: 0x16, sub: Some(0x42), data: &[0x00] },
    );

    table.insert(
        Operation::ToggleVfo,
        Template::CivSet { cmd: 0x07, sub: Some(0xB0), data: &[] },
    );

    // Mode byte + filter byte; filter 3 selects the data sub-mode for
    // DIG (USB-D) and PKT (FM-D).
    for (mode, data) in [
        (Mode::LSB, &[0x00u8, 0x01] as &'static [u8]),
        (Mode::USB, &[0x01, 0x01]),
        (Mode::CW, &[0x03, 0x01]),
        (Mode::CWR, &[0x07, 0x01]),
        (Mode::AM, &[0x02, 0x01]),
        (Mode::FM, &[0x05, 0x01]),
        (Mode::DIG, &[0x01, 0x03]),
        (Mode::PKT, &[0x05, 0x03]),
    ] {
        table.insert(
            Operation::SetMode(mode),
            Template::CivSet { cmd: 0x06, sub: None, data },
        );
    }
    table.insert(Operation::GetMode, Template::CivGet { cmd: 0x04, sub: None });

    table.insert(
        Operation::GetFrequency(Vfo::A),
        Template::CivGet { cmd: 0x25, sub: Some(0x00) },
    );
    table.insert(
        Operation::GetFrequency(Vfo::B),
        Template::CivGet { cmd: 0x25, sub: Some(0x01) },
    );
    table.insert(
        Operation::SetFrequency(Vfo::A),
        Template::CivSetFrequency { cmd: 0x25, sub: Some(0x00) },
    );
    table.insert(
        Operation::SetFrequency(Vfo::B),
        Template::CivSetFrequency { cmd: 0x25, sub: Some(0x01) },
    );

    RadioModel {
        manufacturer: "Icom",
        model: "IC-7300",
        family: ProtocolFamily::CivBinary {
            address: 0x94,
            controller: crate::civ::CONTROLLER_ADDR,
        },
        pad_width: 5,
        table,
    }
}

/// All registered radio models.
pub fn supported_models() -> Vec<RadioModel> {
    vec![ft818(), ic7300()]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Operations every table must define, per the capability contract.
    fn required_operations() -> Vec<Operation> {
        let mut ops = vec![
            Operation::PowerOn,
            Operation::PowerOff,
            Operation::PttOn,
            Operation::PttOff,
            Operation::LockOn,
            Operation::LockOff,
            Operation::ClarifierOn,
            Operation::ClarifierOff,
            Operation::SplitOn,
            Operation::SplitOff,
            Operation::SetTone(ToneMode::Off),
            Operation::SetTone(ToneMode::Ctcss),
            Operation::SetTone(ToneMode::Dcs),
            Operation::SetTone(ToneMode::Encoder),
            Operation::ToggleVfo,
            Operation::GetMode,
            Operation::GetFrequency(Vfo::A),
            Operation::GetFrequency(Vfo::B),
            Operation::SetFrequency(Vfo::A),
            Operation::SetFrequency(Vfo::B),
        ];
        ops.extend(ALL_MODES.iter().map(|m| Operation::SetMode(*m)));
        ops
    }

    #[test]
    fn every_model_defines_required_operations() {
        for model in supported_models() {
            for op in required_operations() {
                assert!(
                    model.lookup(op).is_ok(),
                    "{} missing {op}",
                    model.model
                );
            }
        }
    }

    #[test]
    fn every_model_validates() {
        for model in supported_models() {
            model.validate().unwrap();
        }
    }

    #[test]
    fn table_has_no_extra_entries() {
        // 20 fixed + 8 modes per table; the map makes duplicates impossible,
        // so an exact count proves each required key was inserted once.
        for model in supported_models() {
            assert_eq!(
                model.operation_count(),
                required_operations().len(),
                "{}",
                model.model
            );
        }
    }

    #[test]
    fn lookup_unknown_operation_is_unsupported() {
        let err = ft818().lookup(Operation::Raw).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(err.to_string().contains("FT-818"));
    }

    #[test]
    fn ft818_is_ascii_with_11_digit_fields() {
        let model = ft818();
        assert_eq!(model.family, ProtocolFamily::Ascii);
        assert_eq!(model.pad_width, 11);
        assert_eq!(model.manufacturer, "Yaesu");
    }

    #[test]
    fn ic7300_is_binary_with_bus_addresses() {
        let model = ic7300();
        assert_eq!(
            model.family,
            ProtocolFamily::CivBinary {
                address: 0x94,
                controller: 0xE0
            }
        );
        assert_eq!(model.pad_width, 5);
    }

    #[test]
    fn ft818_distinct_on_off_opcodes() {
        let model = ft818();
        let on = model.lookup(Operation::PttOn).unwrap();
        let off = model.lookup(Operation::PttOff).unwrap();
        assert_ne!(on, off);
        assert_eq!(
            on,
            Template::AsciiSet { mnemonic: "TX", field: "08" }
        );
        assert_eq!(
            off,
            Template::AsciiSet { mnemonic: "TX", field: "88" }
        );
    }

    #[test]
    fn validate_rejects_empty_template() {
        let mut model = ft818();
        model
            .table
            .insert(Operation::Raw, Template::AsciiGet { mnemonic: "" });
        assert!(model.validate().is_err());
    }
}
