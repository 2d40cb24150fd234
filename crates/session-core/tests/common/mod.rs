//! Shared test doubles: a recording native bridge, a recording offload
//! HAL, and recording application callbacks. Spies that participate in
//! ordering tests also append to a shared sequence log so the merged
//! command/event order is observable.

#![allow(dead_code)]

use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, Bytes};
use parking_lot::Mutex;

use imsmedia_config::{
    AudioConfig, CallQuality, MediaQualityStatus, RtpError, RtpHeaderExtension, TextConfig,
    VideoConfig,
};
use imsmedia_session_core::error::{HalError, NativeError};
use imsmedia_session_core::hal::{
    self, HalMediaSession, HalSessionListener, MediaHal,
};
use imsmedia_session_core::native::{ListenerRegistry, NativeBridge};
use imsmedia_session_core::{
    AudioSession, AudioSessionCallback, TextSession, TextSessionCallback, VideoSession,
    VideoSessionCallback,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Poll until `cond` holds; panic after two seconds.
pub async fn wait_for<F: Fn() -> bool>(cond: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met within two seconds");
}

/// Give queued session messages a chance to drain, then assert nothing
/// about them changed (for negative expectations).
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn test_socket() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").expect("bind test socket")
}

pub type SequenceLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug)]
pub enum BridgeCall {
    Open { session_id: i32, message: Bytes },
    Close { session_id: i32 },
    Send { session_id: i32, message: Bytes },
}

impl BridgeCall {
    pub fn tag(&self) -> Option<i32> {
        let message = match self {
            Self::Open { message, .. } | Self::Send { message, .. } => message,
            Self::Close { .. } => return None,
        };
        let mut buf = message.clone();
        (buf.remaining() >= 4).then(|| buf.get_i32())
    }
}

/// Spy native bridge: records every call and exposes the listener
/// registry so tests can inject inbound engine messages.
pub struct TestBridge {
    pub listeners: Arc<ListenerRegistry>,
    pub calls: Mutex<Vec<BridgeCall>>,
    pub log: SequenceLog,
}

impl TestBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: Arc::new(ListenerRegistry::new()),
            calls: Mutex::new(Vec::new()),
            log: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Leading tags of every open/send message for the session, in
    /// arrival order.
    pub fn message_tags(&self, session_id: i32) -> Vec<i32> {
        self.calls
            .lock()
            .iter()
            .filter(|call| match call {
                BridgeCall::Open { session_id: id, .. }
                | BridgeCall::Send { session_id: id, .. } => *id == session_id,
                BridgeCall::Close { .. } => false,
            })
            .filter_map(|call| call.tag())
            .collect()
    }

    pub fn close_count(&self, session_id: i32) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, BridgeCall::Close { session_id: id } if *id == session_id))
            .count()
    }

    /// Inject one inbound engine message through the listener registry.
    pub fn inject(&self, session_id: i32, message: Bytes) {
        self.listeners.dispatch(session_id, message);
    }
}

impl NativeBridge for TestBridge {
    fn open_session(
        &self,
        session_id: i32,
        _rtp_socket: Option<UdpSocket>,
        _rtcp_socket: Option<UdpSocket>,
        message: Bytes,
    ) -> Result<(), NativeError> {
        self.log.lock().push(format!("native:open:{session_id}"));
        self.calls.lock().push(BridgeCall::Open {
            session_id,
            message,
        });
        Ok(())
    }

    fn close_session(&self, session_id: i32) {
        self.log.lock().push(format!("native:close:{session_id}"));
        self.calls.lock().push(BridgeCall::Close { session_id });
    }

    fn send_message(&self, session_id: i32, message: Bytes) -> Result<(), NativeError> {
        let tag = {
            let mut buf = message.clone();
            if buf.remaining() >= 4 {
                buf.get_i32()
            } else {
                -1
            }
        };
        self.log.lock().push(format!("native:send:{tag}"));
        self.calls.lock().push(BridgeCall::Send {
            session_id,
            message,
        });
        Ok(())
    }

    fn generate_video_sprop(&self, configs: &[VideoConfig]) -> Option<String> {
        Some(format!("sprop-sets:{}", configs.len()))
    }
}

#[derive(Debug)]
pub enum HalCall {
    OpenSession {
        session_id: i32,
        config: Option<hal::RtpConfig>,
    },
    CloseSession {
        session_id: i32,
    },
}

/// Spy offload HAL entry point.
pub struct TestHal {
    pub calls: Mutex<Vec<HalCall>>,
}

impl TestHal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl MediaHal for TestHal {
    fn open_session(&self, session_id: i32, config: Option<hal::RtpConfig>) -> Result<(), HalError> {
        self.calls.lock().push(HalCall::OpenSession {
            session_id,
            config,
        });
        Ok(())
    }

    fn close_session(&self, session_id: i32) -> Result<(), HalError> {
        self.calls.lock().push(HalCall::CloseSession { session_id });
        Ok(())
    }
}

#[derive(Debug)]
pub enum HalSessionCall {
    SetListener,
    ModifySession(Option<hal::RtpConfig>),
    SendDtmf { digit: char, duration_millis: i32 },
    StartDtmf { digit: char },
    StopDtmf,
    SendHeaderExtension(Vec<hal::RtpHeaderExtension>),
    SetMediaQualityThreshold(Option<hal::MediaQualityThreshold>),
}

/// Spy per-session HAL object; stores the installed listener so tests
/// can drive HAL callbacks through it.
#[derive(Default)]
pub struct TestHalSession {
    pub calls: Mutex<Vec<HalSessionCall>>,
    pub listener: Mutex<Option<Arc<dyn HalSessionListener>>>,
}

impl TestHalSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        // set_listener is part of the open handshake, not a command.
        self.calls
            .lock()
            .iter()
            .filter(|call| !matches!(call, HalSessionCall::SetListener))
            .count()
    }

    pub fn listener(&self) -> Arc<dyn HalSessionListener> {
        self.listener.lock().clone().expect("listener installed")
    }
}

impl HalMediaSession for TestHalSession {
    fn set_listener(&self, listener: Arc<dyn HalSessionListener>) -> Result<(), HalError> {
        *self.listener.lock() = Some(listener);
        self.calls.lock().push(HalSessionCall::SetListener);
        Ok(())
    }

    fn modify_session(&self, config: Option<hal::RtpConfig>) -> Result<(), HalError> {
        self.calls.lock().push(HalSessionCall::ModifySession(config));
        Ok(())
    }

    fn send_dtmf(&self, digit: char, duration_millis: i32) -> Result<(), HalError> {
        self.calls.lock().push(HalSessionCall::SendDtmf {
            digit,
            duration_millis,
        });
        Ok(())
    }

    fn start_dtmf(&self, digit: char) -> Result<(), HalError> {
        self.calls.lock().push(HalSessionCall::StartDtmf { digit });
        Ok(())
    }

    fn stop_dtmf(&self) -> Result<(), HalError> {
        self.calls.lock().push(HalSessionCall::StopDtmf);
        Ok(())
    }

    fn send_header_extension(
        &self,
        extensions: Vec<hal::RtpHeaderExtension>,
    ) -> Result<(), HalError> {
        self.calls
            .lock()
            .push(HalSessionCall::SendHeaderExtension(extensions));
        Ok(())
    }

    fn set_media_quality_threshold(
        &self,
        threshold: Option<hal::MediaQualityThreshold>,
    ) -> Result<(), HalError> {
        self.calls
            .lock()
            .push(HalSessionCall::SetMediaQualityThreshold(threshold));
        Ok(())
    }
}

#[derive(Debug)]
pub enum AudioCallbackEvent {
    OpenSuccess { session_id: i32 },
    OpenFailure(RtpError),
    Closed,
    ModifyResponse(Option<AudioConfig>, RtpError),
    AddConfigResponse(Option<AudioConfig>, RtpError),
    ConfirmConfigResponse(Option<AudioConfig>, RtpError),
    FirstMediaPacket(Option<AudioConfig>),
    HeaderExtension(Vec<RtpHeaderExtension>),
    QualityStatus(MediaQualityStatus),
    AnbrQuery(Option<AudioConfig>),
    DtmfReceived { digit: char, duration_millis: i32 },
    CallQuality(CallQuality),
}

/// Recording audio callback; also captures the dispatcher handle passed
/// on open-success.
#[derive(Default)]
pub struct RecordingAudioCallback {
    pub events: Mutex<Vec<AudioCallbackEvent>>,
    pub session: Mutex<Option<AudioSession>>,
    pub log: Mutex<Option<SequenceLog>>,
}

impl RecordingAudioCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_log(log: SequenceLog) -> Arc<Self> {
        let callback = Self::default();
        *callback.log.lock() = Some(log);
        Arc::new(callback)
    }

    fn trace(&self, entry: String) {
        if let Some(log) = self.log.lock().as_ref() {
            log.lock().push(entry);
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn open_success_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, AudioCallbackEvent::OpenSuccess { .. }))
            .count()
    }
}

impl AudioSessionCallback for RecordingAudioCallback {
    fn on_open_session_success(&self, session: AudioSession) {
        self.trace(format!("cb:openSuccess:{}", session.session_id()));
        self.events.lock().push(AudioCallbackEvent::OpenSuccess {
            session_id: session.session_id(),
        });
        *self.session.lock() = Some(session);
    }

    fn on_open_session_failure(&self, error: RtpError) {
        self.trace(format!("cb:openFailure:{error:?}"));
        self.events.lock().push(AudioCallbackEvent::OpenFailure(error));
    }

    fn on_session_closed(&self) {
        self.trace("cb:closed".to_string());
        self.events.lock().push(AudioCallbackEvent::Closed);
    }

    fn on_modify_session_response(&self, config: Option<AudioConfig>, error: RtpError) {
        self.trace(format!("cb:modifyResponse:{error:?}"));
        self.events
            .lock()
            .push(AudioCallbackEvent::ModifyResponse(config, error));
    }

    fn on_add_config_response(&self, config: Option<AudioConfig>, error: RtpError) {
        self.events
            .lock()
            .push(AudioCallbackEvent::AddConfigResponse(config, error));
    }

    fn on_confirm_config_response(&self, config: Option<AudioConfig>, error: RtpError) {
        self.events
            .lock()
            .push(AudioCallbackEvent::ConfirmConfigResponse(config, error));
    }

    fn on_first_media_packet_received(&self, config: Option<AudioConfig>) {
        self.events
            .lock()
            .push(AudioCallbackEvent::FirstMediaPacket(config));
    }

    fn on_header_extension_received(&self, extensions: Vec<RtpHeaderExtension>) {
        self.events
            .lock()
            .push(AudioCallbackEvent::HeaderExtension(extensions));
    }

    fn notify_media_quality_status(&self, status: MediaQualityStatus) {
        self.events
            .lock()
            .push(AudioCallbackEvent::QualityStatus(status));
    }

    fn trigger_anbr_query(&self, config: Option<AudioConfig>) {
        self.events.lock().push(AudioCallbackEvent::AnbrQuery(config));
    }

    fn on_dtmf_received(&self, digit: char, duration_millis: i32) {
        self.events.lock().push(AudioCallbackEvent::DtmfReceived {
            digit,
            duration_millis,
        });
    }

    fn on_call_quality_changed(&self, quality: CallQuality) {
        self.events
            .lock()
            .push(AudioCallbackEvent::CallQuality(quality));
    }
}

#[derive(Debug)]
pub enum VideoCallbackEvent {
    OpenSuccess { session_id: i32 },
    OpenFailure(RtpError),
    Closed,
    ModifyResponse(Option<VideoConfig>, RtpError),
    FirstMediaPacket(Option<VideoConfig>),
    PeerDimension { width: i32, height: i32 },
    HeaderExtension(Vec<RtpHeaderExtension>),
    MediaInactivity { packet_type: i32 },
    DataUsage(i64),
}

#[derive(Default)]
pub struct RecordingVideoCallback {
    pub events: Mutex<Vec<VideoCallbackEvent>>,
    pub session: Mutex<Option<VideoSession>>,
}

impl RecordingVideoCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl VideoSessionCallback for RecordingVideoCallback {
    fn on_open_session_success(&self, session: VideoSession) {
        self.events.lock().push(VideoCallbackEvent::OpenSuccess {
            session_id: session.session_id(),
        });
        *self.session.lock() = Some(session);
    }

    fn on_open_session_failure(&self, error: RtpError) {
        self.events.lock().push(VideoCallbackEvent::OpenFailure(error));
    }

    fn on_session_closed(&self) {
        self.events.lock().push(VideoCallbackEvent::Closed);
    }

    fn on_modify_session_response(&self, config: Option<VideoConfig>, error: RtpError) {
        self.events
            .lock()
            .push(VideoCallbackEvent::ModifyResponse(config, error));
    }

    fn on_first_media_packet_received(&self, config: Option<VideoConfig>) {
        self.events
            .lock()
            .push(VideoCallbackEvent::FirstMediaPacket(config));
    }

    fn on_peer_dimension_changed(&self, width: i32, height: i32) {
        self.events
            .lock()
            .push(VideoCallbackEvent::PeerDimension { width, height });
    }

    fn on_header_extension_received(&self, extensions: Vec<RtpHeaderExtension>) {
        self.events
            .lock()
            .push(VideoCallbackEvent::HeaderExtension(extensions));
    }

    fn notify_media_inactivity(&self, packet_type: i32) {
        self.events
            .lock()
            .push(VideoCallbackEvent::MediaInactivity { packet_type });
    }

    fn on_video_data_usage_changed(&self, bytes_used: i64) {
        self.events.lock().push(VideoCallbackEvent::DataUsage(bytes_used));
    }
}

#[derive(Debug)]
pub enum TextCallbackEvent {
    OpenSuccess { session_id: i32 },
    OpenFailure(RtpError),
    Closed,
    ModifyResponse(Option<TextConfig>, RtpError),
    MediaInactivity { packet_type: i32 },
    RttReceived(String),
}

#[derive(Default)]
pub struct RecordingTextCallback {
    pub events: Mutex<Vec<TextCallbackEvent>>,
    pub session: Mutex<Option<TextSession>>,
}

impl RecordingTextCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl TextSessionCallback for RecordingTextCallback {
    fn on_open_session_success(&self, session: TextSession) {
        self.events.lock().push(TextCallbackEvent::OpenSuccess {
            session_id: session.session_id(),
        });
        *self.session.lock() = Some(session);
    }

    fn on_open_session_failure(&self, error: RtpError) {
        self.events.lock().push(TextCallbackEvent::OpenFailure(error));
    }

    fn on_session_closed(&self) {
        self.events.lock().push(TextCallbackEvent::Closed);
    }

    fn on_modify_session_response(&self, config: Option<TextConfig>, error: RtpError) {
        self.events
            .lock()
            .push(TextCallbackEvent::ModifyResponse(config, error));
    }

    fn notify_media_inactivity(&self, packet_type: i32) {
        self.events
            .lock()
            .push(TextCallbackEvent::MediaInactivity { packet_type });
    }

    fn on_rtt_received(&self, rtt_text: String) {
        self.events.lock().push(TextCallbackEvent::RttReceived(rtt_text));
    }
}
