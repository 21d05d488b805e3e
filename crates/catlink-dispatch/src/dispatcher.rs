//! The [`Dispatcher`] -- one radio model, one session, one gate.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use catlink_core::command::DEFAULT_TIMEOUT;
use catlink_core::{
    Command, Mode, Operation, ParamValue, ReplyValue, Response, Result, ToneMode, Vfo,
};
use catlink_proto::{codec, RadioModel};
use catlink_session::{PortFactory, SerialSettings, Session, SessionStatus};

/// Operation-level façade over one radio.
///
/// Holds exactly one [`Session`] and one [`RadioModel`]. The port factory
/// is injected at construction, so tests run against a scripted port and
/// nothing here touches a global registry.
pub struct Dispatcher {
    session: Session,
    model: RadioModel,
    command_timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher for `model`, opening ports through `factory`.
    pub fn new(model: RadioModel, factory: Arc<dyn PortFactory>) -> Self {
        Dispatcher {
            session: Session::new(factory),
            model,
            command_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-command reply deadline (default 1000 ms).
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// The active radio model.
    pub fn model(&self) -> &RadioModel {
        &self.model
    }

    /// Open the session on the given port.
    pub async fn open(&self, settings: &SerialSettings) -> Result<()> {
        debug!(model = self.model.model, port = %settings.port, "open");
        self.session.open(settings).await
    }

    /// Close the session. Idempotent.
    pub async fn close(&self) -> Result<()> {
        debug!(model = self.model.model, "close");
        self.session.close().await
    }

    /// Open/closed state and port name.
    pub async fn status(&self) -> SessionStatus {
        self.session.status().await
    }

    /// Send caller-supplied text verbatim and return the raw exchange.
    ///
    /// No table lookup, no decoding; the service layer's escape hatch.
    pub async fn send_raw(&self, text: &str) -> Result<Response> {
        debug!(command = text, "send raw");
        let command = Command::raw(text, self.command_timeout);
        self.session.execute(&command).await
    }

    /// Read a VFO's frequency in hertz.
    ///
    /// `Ok(None)` when the radio did not answer or the reply did not parse;
    /// both are ordinary outcomes, not errors.
    pub async fn get_frequency(&self, vfo: Vfo) -> Result<Option<u64>> {
        let resp = self.run(Operation::GetFrequency(vfo), None).await?;
        Ok(match resp.value {
            Some(ReplyValue::Hz(hz)) => Some(hz),
            _ => None,
        })
    }

    /// Set a VFO's frequency in hertz.
    ///
    /// Range is validated before any I/O: an out-of-range value is rejected
    /// with zero bytes written. The returned flag reports that the transport
    /// wrote the frame and the radio did not reject it -- there is no
    /// read-back confirmation.
    pub async fn set_frequency(&self, vfo: Vfo, hz: u64) -> Result<bool> {
        self.run_set(Operation::SetFrequency(vfo), Some(ParamValue::Hz(hz)))
            .await
    }

    /// Read the operating mode.
    pub async fn get_mode(&self) -> Result<Option<Mode>> {
        let resp = self.run(Operation::GetMode, None).await?;
        Ok(match resp.value {
            Some(ReplyValue::Mode(mode)) => Some(mode),
            _ => None,
        })
    }

    /// Set the operating mode.
    pub async fn set_mode(&self, mode: Mode) -> Result<bool> {
        self.run_set(Operation::SetMode(mode), None).await
    }

    /// Key or release the transmitter.
    pub async fn set_ptt(&self, on: bool) -> Result<bool> {
        self.run_set(pick(on, Operation::PttOn, Operation::PttOff), None)
            .await
    }

    /// Lock or unlock the front panel.
    pub async fn set_lock(&self, on: bool) -> Result<bool> {
        self.run_set(pick(on, Operation::LockOn, Operation::LockOff), None)
            .await
    }

    /// Enable or disable the clarifier.
    pub async fn set_clarifier(&self, on: bool) -> Result<bool> {
        self.run_set(
            pick(on, Operation::ClarifierOn, Operation::ClarifierOff),
            None,
        )
        .await
    }

    /// Enable or disable split operation.
    pub async fn set_split(&self, on: bool) -> Result<bool> {
        self.run_set(pick(on, Operation::SplitOn, Operation::SplitOff), None)
            .await
    }

    /// Power the radio on or off.
    pub async fn set_power(&self, on: bool) -> Result<bool> {
        self.run_set(pick(on, Operation::PowerOn, Operation::PowerOff), None)
            .await
    }

    /// Select a repeater tone mode.
    pub async fn set_tone(&self, tone: ToneMode) -> Result<bool> {
        self.run_set(Operation::SetTone(tone), None).await
    }

    /// Toggle between VFO A and VFO B.
    pub async fn toggle_vfo(&self) -> Result<bool> {
        self.run_set(Operation::ToggleVfo, None).await
    }

    /// Common path: resolve, encode, execute, decode.
    async fn run(&self, op: Operation, param: Option<ParamValue>) -> Result<Response> {
        let command = codec::encode(&self.model, op, param.as_ref(), self.command_timeout)?;
        let resp = self.session.execute(&command).await?;
        let value = codec::decode(&self.model, op, &resp.raw);
        debug!(
            op = %op,
            success = resp.success,
            decoded = value.is_some(),
            elapsed_ms = resp.elapsed.as_millis() as u64,
            "dispatched"
        );
        Ok(resp.with_value(value))
    }

    /// Set-command path: success unless the radio explicitly rejected the
    /// frame. Silence is success -- these commands are fire-and-forget.
    async fn run_set(&self, op: Operation, param: Option<ParamValue>) -> Result<bool> {
        let resp = self.run(op, param).await?;
        if resp.error.is_some() {
            return Ok(false);
        }
        Ok(match resp.value {
            Some(ReplyValue::Accepted(accepted)) => accepted,
            _ => true,
        })
    }
}

fn pick(on: bool, when_on: Operation, when_off: Operation) -> Operation {
    if on { when_on } else { when_off }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catlink_core::Error;
    use catlink_proto::{ft818, ic7300};
    use catlink_test_harness::MockPortFactory;
    use pretty_assertions::assert_eq;
    use std::time::Instant;

    /// Short timeouts keep the silent-radio tests fast.
    fn fast_settings(port: &str) -> SerialSettings {
        SerialSettings {
            timeout_ms: 50,
            settle_delay_ms: 5,
            ..SerialSettings::for_port(port)
        }
    }

    fn dispatcher(model: RadioModel, factory: &MockPortFactory) -> Dispatcher {
        Dispatcher::new(model, Arc::new(factory.clone()))
            .with_command_timeout(Duration::from_millis(50))
    }

    async fn open_dispatcher(model: RadioModel, factory: &MockPortFactory) -> Dispatcher {
        let d = dispatcher(model, factory);
        d.open(&fast_settings("COM3")).await.unwrap();
        d
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn calls_on_closed_session_fail_fast() {
        let factory = MockPortFactory::new();
        let d = dispatcher(ft818(), &factory);

        assert!(matches!(
            d.get_frequency(Vfo::A).await.unwrap_err(),
            Error::NotOpen
        ));
        assert!(matches!(d.set_ptt(true).await.unwrap_err(), Error::NotOpen));
        assert_eq!(factory.write_count(), 0);
    }

    #[tokio::test]
    async fn open_failure_is_a_transport_error() {
        let factory = MockPortFactory::new();
        factory.fail_next_open();
        let d = dispatcher(ft818(), &factory);

        let err = d.open(&fast_settings("COM99")).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!d.status().await.is_open);
    }

    #[tokio::test]
    async fn status_tracks_the_session() {
        let factory = MockPortFactory::new();
        let d = open_dispatcher(ft818(), &factory).await;

        let status = d.status().await;
        assert!(status.is_open);
        assert_eq!(status.port_name.as_deref(), Some("COM3"));

        d.close().await.unwrap();
        assert_eq!(
            d.status().await,
            SessionStatus {
                is_open: false,
                port_name: None
            }
        );
    }

    // ---------------------------------------------------------------
    // Frequency
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn get_frequency_parses_the_reply() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"FA00014074000;");
        let d = open_dispatcher(ft818(), &factory).await;

        assert_eq!(d.get_frequency(Vfo::A).await.unwrap(), Some(14_074_000));
        assert_eq!(factory.writes(), vec![b"FA;".to_vec()]);
    }

    #[tokio::test]
    async fn get_frequency_silent_radio_is_absent() {
        let factory = MockPortFactory::new();
        let d = open_dispatcher(ft818(), &factory).await;

        assert_eq!(d.get_frequency(Vfo::A).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_frequency_malformed_reply_is_absent() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"XY123;");
        let d = open_dispatcher(ft818(), &factory).await;

        assert_eq!(d.get_frequency(Vfo::A).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_frequency_writes_the_padded_field() {
        let factory = MockPortFactory::new();
        let d = open_dispatcher(ft818(), &factory).await;

        assert!(d.set_frequency(Vfo::B, 7_074_000).await.unwrap());
        assert_eq!(factory.writes(), vec![b"FB00007074000;".to_vec()]);
    }

    #[tokio::test]
    async fn set_frequency_out_of_range_writes_nothing() {
        let factory = MockPortFactory::new();
        let d = open_dispatcher(ft818(), &factory).await;

        let err = d
            .set_frequency(Vfo::A, 1_000_000_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
        assert_eq!(factory.write_count(), 0);
    }

    #[tokio::test]
    async fn set_frequency_error_reply_reports_rejection() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"?;");
        let d = open_dispatcher(ft818(), &factory).await;

        assert!(!d.set_frequency(Vfo::A, 14_074_000).await.unwrap());
    }

    // ---------------------------------------------------------------
    // Mode and switches
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn get_mode_parses_the_reply() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"MD0A;");
        let d = open_dispatcher(ft818(), &factory).await;

        assert_eq!(d.get_mode().await.unwrap(), Some(Mode::DIG));
    }

    #[tokio::test]
    async fn switches_use_the_model_opcodes() {
        let factory = MockPortFactory::new();
        let d = open_dispatcher(ft818(), &factory).await;

        assert!(d.set_ptt(true).await.unwrap());
        assert!(d.set_ptt(false).await.unwrap());
        assert!(d.set_lock(true).await.unwrap());
        assert!(d.set_clarifier(false).await.unwrap());
        assert!(d.set_split(true).await.unwrap());
        assert!(d.set_power(false).await.unwrap());
        assert!(d.set_tone(ToneMode::Ctcss).await.unwrap());
        assert!(d.toggle_vfo().await.unwrap());
        assert!(d.set_mode(Mode::USB).await.unwrap());

        let writes = factory.writes();
        let expected: Vec<&[u8]> = vec![
            b"TX08;", b"TX88;", b"LK00;", b"RT85;", b"FT02;", b"PS8F;", b"CT2A;", b"VS81;",
            b"MD01;",
        ];
        assert_eq!(writes.len(), expected.len());
        for (written, expected) in writes.iter().zip(expected) {
            assert_eq!(written.as_slice(), expected);
        }
    }

    // ---------------------------------------------------------------
    // Binary family end to end
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn civ_get_frequency_round_trip() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(&[
            0xFE, 0xFE, 0xE0, 0x94, 0x25, 0x00, 0x00, 0x40, 0x07, 0x14, 0x00, 0xFD,
        ]);
        let d = open_dispatcher(ic7300(), &factory).await;

        assert_eq!(d.get_frequency(Vfo::A).await.unwrap(), Some(14_074_000));
        assert_eq!(
            factory.writes(),
            vec![vec![0xFE, 0xFE, 0x94, 0xE0, 0x25, 0x00, 0xFD]]
        );
    }

    #[tokio::test]
    async fn civ_set_rejected_by_ng_frame() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(&[0xFE, 0xFE, 0xE0, 0x94, 0xFA, 0xFD]);
        let d = open_dispatcher(ic7300(), &factory).await;

        assert!(!d.set_split(true).await.unwrap());
    }

    #[tokio::test]
    async fn civ_set_accepted_by_ok_frame() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(&[0xFE, 0xFE, 0xE0, 0x94, 0xFB, 0xFD]);
        let d = open_dispatcher(ic7300(), &factory).await;

        assert!(d.set_ptt(true).await.unwrap());
        assert_eq!(
            factory.writes(),
            vec![vec![0xFE, 0xFE, 0x94, 0xE0, 0x1C, 0x00, 0x01, 0xFD]]
        );
    }

    // ---------------------------------------------------------------
    // Raw commands
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn send_raw_passes_text_through() {
        let factory = MockPortFactory::new();
        factory.enqueue_reply(b"FA00014074000;");
        let d = open_dispatcher(ft818(), &factory).await;

        let resp = d.send_raw("FA;").await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.raw, b"FA00014074000;");
        assert_eq!(factory.writes(), vec![b"FA;".to_vec()]);
    }

    #[tokio::test]
    async fn send_raw_on_dead_port_times_out_without_throwing() {
        let factory = MockPortFactory::new();
        let d = open_dispatcher(ft818(), &factory).await;

        let started = Instant::now();
        let resp = d.send_raw("FA;").await.unwrap();
        assert!(!resp.success);
        assert!(resp.raw.is_empty());
        // The full configured read timeout elapsed before giving up.
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
