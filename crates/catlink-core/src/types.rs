//! Core types used throughout catlink.
//!
//! These provide the radio-agnostic operation vocabulary. The per-model
//! encoding of each operation lives in the capability tables in
//! `catlink-proto`; nothing here knows about wire formats.

use std::fmt;
use std::str::FromStr;

/// Operating mode of the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Lower sideband voice.
    LSB,
    /// Upper sideband voice.
    USB,
    /// CW (morse).
    CW,
    /// CW reverse (opposite sideband offset).
    CWR,
    /// Amplitude modulation.
    AM,
    /// Frequency modulation.
    FM,
    /// Digital (sound-card data, upper sideband).
    DIG,
    /// Packet (FM data).
    PKT,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::LSB => "LSB",
            Mode::USB => "USB",
            Mode::CW => "CW",
            Mode::CWR => "CWR",
            Mode::AM => "AM",
            Mode::FM => "FM",
            Mode::DIG => "DIG",
            Mode::PKT => "PKT",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string cannot be parsed into a [`Mode`],
/// [`ToneMode`], or [`Vfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTypeError(String);

impl fmt::Display for ParseTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for ParseTypeError {}

impl FromStr for Mode {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LSB" => Ok(Mode::LSB),
            "USB" => Ok(Mode::USB),
            "CW" => Ok(Mode::CW),
            "CWR" => Ok(Mode::CWR),
            "AM" => Ok(Mode::AM),
            "FM" => Ok(Mode::FM),
            "DIG" => Ok(Mode::DIG),
            "PKT" => Ok(Mode::PKT),
            _ => Err(ParseTypeError(s.to_string())),
        }
    }
}

/// Repeater tone mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneMode {
    /// No tone.
    Off,
    /// CTCSS encode and decode.
    Ctcss,
    /// DCS (digital coded squelch).
    Dcs,
    /// CTCSS encode only.
    Encoder,
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToneMode::Off => "OFF",
            ToneMode::Ctcss => "CTCSS",
            ToneMode::Dcs => "DCS",
            ToneMode::Encoder => "ENCODER",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ToneMode {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(ToneMode::Off),
            "CTCSS" => Ok(ToneMode::Ctcss),
            "DCS" => Ok(ToneMode::Dcs),
            "ENCODER" | "ENC" => Ok(ToneMode::Encoder),
            _ => Err(ParseTypeError(s.to_string())),
        }
    }
}

/// One of the two independently tunable channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vfo {
    /// VFO A, the main channel.
    A,
    /// VFO B, the alternate channel.
    B,
}

impl fmt::Display for Vfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vfo::A => write!(f, "VFO-A"),
            Vfo::B => write!(f, "VFO-B"),
        }
    }
}

impl FromStr for Vfo {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" | "VFO-A" | "VFOA" => Ok(Vfo::A),
            "B" | "VFO-B" | "VFOB" => Ok(Vfo::B),
            _ => Err(ParseTypeError(s.to_string())),
        }
    }
}

/// An abstract radio operation.
///
/// Operations are the keys of a radio model's capability table. Parameterized
/// operations fold their parameter into the key (`SetMode(Mode::USB)` and
/// `SetMode(Mode::CW)` are distinct entries), which keeps the tables pure
/// data and makes key uniqueness structural.
///
/// [`Operation::Raw`] is the pass-through used by `send_raw`; it never
/// appears in a capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Power the radio on.
    PowerOn,
    /// Power the radio off.
    PowerOff,
    /// Key the transmitter.
    PttOn,
    /// Return to receive.
    PttOff,
    /// Lock the front panel.
    LockOn,
    /// Unlock the front panel.
    LockOff,
    /// Enable the clarifier (receive offset).
    ClarifierOn,
    /// Disable the clarifier.
    ClarifierOff,
    /// Enable split TX/RX operation.
    SplitOn,
    /// Disable split operation.
    SplitOff,
    /// Select a repeater tone mode.
    SetTone(ToneMode),
    /// Toggle between VFO A and VFO B.
    ToggleVfo,
    /// Set the operating mode.
    SetMode(Mode),
    /// Read the operating mode.
    GetMode,
    /// Read the frequency of a VFO, in hertz.
    GetFrequency(Vfo),
    /// Set the frequency of a VFO, in hertz.
    SetFrequency(Vfo),
    /// Caller-supplied bytes sent verbatim.
    Raw,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::PowerOn => write!(f, "power-on"),
            Operation::PowerOff => write!(f, "power-off"),
            Operation::PttOn => write!(f, "ptt-on"),
            Operation::PttOff => write!(f, "ptt-off"),
            Operation::LockOn => write!(f, "lock-on"),
            Operation::LockOff => write!(f, "lock-off"),
            Operation::ClarifierOn => write!(f, "clarifier-on"),
            Operation::ClarifierOff => write!(f, "clarifier-off"),
            Operation::SplitOn => write!(f, "split-on"),
            Operation::SplitOff => write!(f, "split-off"),
            Operation::SetTone(t) => write!(f, "set-tone-{}", t.to_string().to_lowercase()),
            Operation::ToggleVfo => write!(f, "toggle-vfo"),
            Operation::SetMode(m) => write!(f, "set-mode-{}", m.to_string().to_lowercase()),
            Operation::GetMode => write!(f, "get-mode"),
            Operation::GetFrequency(v) => match v {
                Vfo::A => write!(f, "get-frequency-a"),
                Vfo::B => write!(f, "get-frequency-b"),
            },
            Operation::SetFrequency(v) => match v {
                Vfo::A => write!(f, "set-frequency-a"),
                Vfo::B => write!(f, "set-frequency-b"),
            },
            Operation::Raw => write!(f, "raw"),
        }
    }
}
