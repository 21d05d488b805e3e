//! Serial session configuration.
//!
//! [`SerialSettings`] is the boundary type the surrounding service layer
//! hands to `open`. It is serde-derived so the out-of-scope HTTP/JSON layer
//! can deserialize requests straight into it, and it round-trips through a
//! JSON file for persistent configuration.
//!
//! The enumerations mirror the full parameter surface of a classic serial
//! API (including Mark/Space parity and 1.5 stop bits); combinations the
//! backend cannot express are rejected at `open` time, not silently
//! approximated.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use catlink_core::{Error, Result};

/// Permitted serial line speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BaudRate {
    B1200,
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
}

impl BaudRate {
    /// The line speed in bits per second.
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
        }
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> u32 {
        rate.bps()
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = String;

    fn try_from(bps: u32) -> std::result::Result<Self, Self::Error> {
        match bps {
            1200 => Ok(BaudRate::B1200),
            2400 => Ok(BaudRate::B2400),
            4800 => Ok(BaudRate::B4800),
            9600 => Ok(BaudRate::B9600),
            19200 => Ok(BaudRate::B19200),
            38400 => Ok(BaudRate::B38400),
            other => Err(format!("unsupported baud rate: {other}")),
        }
    }
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
    Mark,
    Space,
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopBits {
    None,
    #[default]
    One,
    OnePointFive,
    Two,
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataBits {
    Seven,
    #[default]
    Eight,
}

/// Flow control (handshake) mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowControl {
    #[default]
    None,
    RequestToSend,
    RequestToSendXonXoff,
    XonXoff,
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    100
}

/// Full configuration for opening a serial session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Port identifier (e.g. `COM3`, `/dev/ttyUSB0`).
    pub port: String,
    /// Line speed.
    pub baud_rate: BaudRate,
    /// Parity checking.
    pub parity: Parity,
    /// Stop bits.
    pub stop_bits: StopBits,
    /// Data bits.
    pub data_bits: DataBits,
    /// Flow control.
    pub flow_control: FlowControl,
    /// Read/write deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause between writing a command and draining the reply, in
    /// milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        SerialSettings {
            port: String::new(),
            baud_rate: BaudRate::B9600,
            parity: Parity::None,
            stop_bits: StopBits::One,
            data_bits: DataBits::Eight,
            flow_control: FlowControl::None,
            timeout_ms: default_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl SerialSettings {
    /// Settings for a port at the default 9600 8N1.
    pub fn for_port(port: &str) -> Self {
        SerialSettings {
            port: port.to_string(),
            ..Default::default()
        }
    }

    /// The read/write deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("invalid serial settings: {e}")))
    }

    /// Save settings to a JSON file, pretty-printed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Transport(format!("cannot serialize settings: {e}")))?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
