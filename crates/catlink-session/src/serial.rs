//! tokio-serial port backend.
//!
//! [`SerialPortFactory`] opens real serial ports and hands them to the
//! session as boxed [`RawPort`]s. Most modern transceivers present as USB
//! virtual COM ports; physical RS-232 works the same way.
//!
//! DTR and RTS are de-asserted immediately after opening. Many radios route
//! those lines to CW key or PTT inputs, and the OS asserting DTR on open
//! would key the transmitter.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort as _, SerialPortBuilderExt, SerialStream};

use catlink_core::{Error, RawPort, Result};

use crate::config::{DataBits, FlowControl, Parity, SerialSettings, StopBits};
use crate::session::PortFactory;

/// List the serial ports present on this machine.
///
/// Feeds the service layer's port picker. Enumeration failures surface as
/// an empty list; a machine without ports is not an error.
pub fn available_ports() -> Vec<String> {
    match tokio_serial::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to enumerate serial ports");
            Vec::new()
        }
    }
}

fn map_parity(parity: Parity) -> Result<tokio_serial::Parity> {
    match parity {
        Parity::None => Ok(tokio_serial::Parity::None),
        Parity::Odd => Ok(tokio_serial::Parity::Odd),
        Parity::Even => Ok(tokio_serial::Parity::Even),
        Parity::Mark | Parity::Space => Err(Error::Transport(format!(
            "{parity:?} parity is not supported by the serial backend"
        ))),
    }
}

fn map_stop_bits(bits: StopBits) -> Result<tokio_serial::StopBits> {
    match bits {
        StopBits::One => Ok(tokio_serial::StopBits::One),
        StopBits::Two => Ok(tokio_serial::StopBits::Two),
        StopBits::None | StopBits::OnePointFive => Err(Error::Transport(format!(
            "{bits:?} stop bits are not supported by the serial backend"
        ))),
    }
}

fn map_data_bits(bits: DataBits) -> tokio_serial::DataBits {
    match bits {
        DataBits::Seven => tokio_serial::DataBits::Seven,
        DataBits::Eight => tokio_serial::DataBits::Eight,
    }
}

fn map_flow_control(flow: FlowControl) -> tokio_serial::FlowControl {
    match flow {
        FlowControl::None => tokio_serial::FlowControl::None,
        FlowControl::RequestToSend => tokio_serial::FlowControl::Hardware,
        FlowControl::XonXoff => tokio_serial::FlowControl::Software,
        FlowControl::RequestToSendXonXoff => {
            // The backend expresses one mechanism at a time; RTS/CTS is the
            // one that matters for half-duplex CAT links.
            tracing::warn!("combined RTS + XON/XOFF requested; using RTS/CTS only");
            tokio_serial::FlowControl::Hardware
        }
    }
}

/// A real serial port.
pub struct SerialPort {
    stream: Option<SerialStream>,
    port_name: String,
    write_timeout: Duration,
}

#[async_trait]
impl RawPort for SerialPort {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;

        tracing::trace!(port = %self.port_name, bytes = data.len(), data = ?data, "writing");

        let deadline = self.write_timeout;
        tokio::time::timeout(deadline, async {
            stream.write_all(data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| Error::Timeout)?
        .map_err(Error::Io)?;

        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;

        match tokio::time::timeout(timeout, stream.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(port = %self.port_name, bytes = n, data = ?&buf[..n], "read");
                Ok(n)
            }
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!(port = %self.port_name, "closing serial port");
            if let Err(e) = stream.flush().await {
                tracing::warn!(port = %self.port_name, error = %e, "flush before close failed");
            }
            // The stream closes on drop.
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

/// Factory that opens tokio-serial ports.
///
/// Injected into the dispatcher at construction time; the session never
/// reaches for a global port registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortFactory;

#[async_trait]
impl PortFactory for SerialPortFactory {
    async fn open(&self, settings: &SerialSettings) -> Result<Box<dyn RawPort>> {
        tracing::debug!(
            port = %settings.port,
            baud = settings.baud_rate.bps(),
            parity = ?settings.parity,
            stop_bits = ?settings.stop_bits,
            data_bits = ?settings.data_bits,
            flow = ?settings.flow_control,
            "opening serial port"
        );

        let parity = map_parity(settings.parity)?;
        let stop_bits = map_stop_bits(settings.stop_bits)?;

        let mut stream = tokio_serial::new(&settings.port, settings.baud_rate.bps())
            .parity(parity)
            .stop_bits(stop_bits)
            .data_bits(map_data_bits(settings.data_bits))
            .flow_control(map_flow_control(settings.flow_control))
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %settings.port, error = %e, "failed to open serial port");
                Error::Transport(format!("failed to open {}: {e}", settings.port))
            })?;

        if let Err(e) = stream.write_data_terminal_ready(false) {
            tracing::warn!(port = %settings.port, error = %e, "failed to de-assert DTR");
        }
        if let Err(e) = stream.write_request_to_send(false) {
            tracing::warn!(port = %settings.port, error = %e, "failed to de-assert RTS");
        }

        tracing::info!(port = %settings.port, baud = settings.baud_rate.bps(), "serial port opened");

        Ok(Box::new(SerialPort {
            stream: Some(stream),
            port_name: settings.port.clone(),
            write_timeout: settings.timeout(),
        }))
    }
}
