//! Audio session dispatcher
//!
//! Handles every audio session API command and every inbound event on
//! one ordered queue. Audio is the only media type that can run
//! offloaded; the mode is fixed when the session is constructed and the
//! command set is not symmetric across modes: `delete_config` and
//! `confirm_config` exist only on the local path and degrade to no-ops
//! on an offload session.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use imsmedia_config::{
    AudioConfig, CallQuality, MediaQualityStatus, MediaQualityThreshold, RtpError,
    RtpHeaderExtension,
};

use crate::callback::AudioSessionCallback;
use crate::codec::hal as hal_codec;
use crate::codec::{wire, WireWriter};
use crate::error::HalError;
use crate::hal::HalMediaSession;
use crate::listener::audio::{AudioListener, AudioOffloadListener};
use crate::local::{AudioLocalSession, LocalService};
use crate::offload::AudioOffloadService;
use crate::session::TerminationHook;
use crate::types::{OpenSessionParams, SessionState};

pub const CMD_OPEN_SESSION: i32 = 101;
pub const CMD_CLOSE_SESSION: i32 = 102;
pub const CMD_MODIFY_SESSION: i32 = 103;
pub const CMD_ADD_CONFIG: i32 = 104;
pub const CMD_DELETE_CONFIG: i32 = 105;
pub const CMD_CONFIRM_CONFIG: i32 = 106;
pub const CMD_SEND_DTMF: i32 = 107;
pub const CMD_SEND_RTP_HDR_EXTN: i32 = 108;
pub const CMD_SET_MEDIA_QUALITY_THRESHOLD: i32 = 109;
pub const CMD_START_DTMF: i32 = 110;
pub const CMD_STOP_DTMF: i32 = 111;

pub const EVENT_OPEN_SESSION_SUCCESS: i32 = 201;
pub const EVENT_OPEN_SESSION_FAILURE: i32 = 202;
pub const EVENT_MODIFY_SESSION_RESPONSE: i32 = 203;
pub const EVENT_ADD_CONFIG_RESPONSE: i32 = 204;
pub const EVENT_CONFIRM_CONFIG_RESPONSE: i32 = 205;
pub const EVENT_FIRST_MEDIA_PACKET_IND: i32 = 206;
pub const EVENT_RTP_HEADER_EXTENSION_IND: i32 = 207;
pub const EVENT_MEDIA_QUALITY_STATUS_IND: i32 = 208;
pub const EVENT_TRIGGER_ANBR_QUERY_IND: i32 = 209;
pub const EVENT_DTMF_RECEIVED_IND: i32 = 210;
pub const EVENT_CALL_QUALITY_CHANGE_IND: i32 = 211;
pub const EVENT_SESSION_CLOSED: i32 = 212;

/// Duration used when a local start-DTMF has no explicit stop.
const DTMF_DEFAULT_DURATION: i32 = 140;

/// Application-issued commands.
#[derive(Debug)]
pub(crate) enum AudioCommand {
    Open(OpenSessionParams<AudioConfig>),
    Close,
    Modify(AudioConfig),
    AddConfig(AudioConfig),
    DeleteConfig(AudioConfig),
    ConfirmConfig(AudioConfig),
    SendDtmf { digit: char, duration_millis: i32 },
    StartDtmf { digit: char },
    StopDtmf,
    SendHeaderExtension(Vec<RtpHeaderExtension>),
    SetMediaQualityThreshold(MediaQualityThreshold),
}

/// Runtime handle bound into the dispatcher on open-success.
pub enum OpenedAudioSession {
    /// Local engine session handle, built by the native listener
    Local(AudioLocalSession),
    /// HAL session object returned by the offload open
    Offload(Arc<dyn HalMediaSession>),
}

impl fmt::Debug for OpenedAudioSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(session) => write!(f, "Local(session {})", session.session_id()),
            Self::Offload(_) => write!(f, "Offload(..)"),
        }
    }
}

/// Listener-delivered events.
pub(crate) enum AudioEvent {
    OpenSuccess(OpenedAudioSession),
    OpenFailure(RtpError),
    SessionClosed,
    ModifyResponse {
        config: Option<AudioConfig>,
        error: RtpError,
    },
    AddConfigResponse {
        config: Option<AudioConfig>,
        error: RtpError,
    },
    ConfirmConfigResponse {
        config: Option<AudioConfig>,
        error: RtpError,
    },
    FirstMediaPacket(Option<AudioConfig>),
    HeaderExtension(Vec<RtpHeaderExtension>),
    QualityStatus(MediaQualityStatus),
    TriggerAnbrQuery(Option<AudioConfig>),
    DtmfReceived { digit: char, duration_millis: i32 },
    CallQualityChanged(CallQuality),
}

/// One entry in the session's merged command/event queue.
pub(crate) enum AudioSessionMessage {
    Command(AudioCommand),
    Event(AudioEvent),
}

/// Execution backend, selected once at construction and injected into
/// the consumer task. All local/offload asymmetry lives here, not in
/// the command handlers.
enum AudioBackend {
    Local {
        service: LocalService,
        listener: Arc<AudioListener>,
        session: Option<AudioLocalSession>,
    },
    Offload {
        service: AudioOffloadService,
        listener: Arc<AudioOffloadListener>,
        session: Option<Arc<dyn HalMediaSession>>,
    },
}

impl AudioBackend {
    fn open(&self, session_id: i32, params: OpenSessionParams<AudioConfig>) {
        match self {
            Self::Local {
                service, listener, ..
            } => {
                let mut writer = WireWriter::tagged(CMD_OPEN_SESSION);
                wire::encode_opt_audio_config(&mut writer, params.rtp_config.as_ref());
                service.open_session(
                    session_id,
                    listener.clone(),
                    params.rtp_socket,
                    params.rtcp_socket,
                    writer.into_bytes(),
                );
            }
            Self::Offload { service, .. } => {
                service.open_session(
                    session_id,
                    hal_codec::audio_config_to_hal(params.rtp_config.as_ref()),
                );
            }
        }
    }

    fn close(&self, session_id: i32) {
        debug!(session_id, "handleCloseSession");
        match self {
            Self::Local { service, .. } => service.close_session(session_id),
            Self::Offload { service, .. } => service.close_session(session_id),
        }
    }

    /// Bind the runtime handle delivered by open-success. On the
    /// offload path this also installs the HAL callback listener.
    fn bind(&mut self, session_id: i32, opened: OpenedAudioSession) {
        match (self, opened) {
            (Self::Local { session, .. }, OpenedAudioSession::Local(local)) => {
                *session = Some(local);
            }
            (
                Self::Offload {
                    session, listener, ..
                },
                OpenedAudioSession::Offload(hal_session),
            ) => {
                if let Err(fault) = hal_session.set_listener(listener.clone()) {
                    error!(session_id, %fault, "setListener");
                }
                *session = Some(hal_session);
            }
            _ => warn!(
                session_id,
                "open-success handle does not match the session's execution mode"
            ),
        }
    }

    fn teardown(&self, session_id: i32) {
        if let Self::Local { service, .. } = self {
            service.unregister(session_id);
        }
    }

    fn modify(&self, session_id: i32, config: &AudioConfig) {
        match self {
            Self::Local { session, .. } => match session {
                Some(session) => session.modify_session(config),
                None => not_open(session_id, "modifySession"),
            },
            Self::Offload { session, .. } => match session {
                Some(session) => log_fault(
                    session_id,
                    "modifySession",
                    session.modify_session(hal_codec::audio_config_to_hal(Some(config))),
                ),
                None => not_open(session_id, "modifySession"),
            },
        }
    }

    fn add_config(&self, session_id: i32, config: &AudioConfig) {
        match self {
            Self::Local { session, .. } => match session {
                Some(session) => session.add_config(config),
                None => not_open(session_id, "addConfig"),
            },
            // The HAL has no separate add-config; it folds into modify.
            Self::Offload { session, .. } => match session {
                Some(session) => log_fault(
                    session_id,
                    "addConfig",
                    session.modify_session(hal_codec::audio_config_to_hal(Some(config))),
                ),
                None => not_open(session_id, "addConfig"),
            },
        }
    }

    /// Local-only: no offload equivalent exists.
    fn delete_config(&self, session_id: i32, config: &AudioConfig) {
        if let Self::Local { session, .. } = self {
            match session {
                Some(session) => session.delete_config(config),
                None => not_open(session_id, "deleteConfig"),
            }
        }
    }

    /// Local-only: no offload equivalent exists.
    fn confirm_config(&self, session_id: i32, config: &AudioConfig) {
        if let Self::Local { session, .. } = self {
            match session {
                Some(session) => session.confirm_config(config),
                None => not_open(session_id, "confirmConfig"),
            }
        }
    }

    fn send_dtmf(&self, session_id: i32, digit: char, duration_millis: i32) {
        match self {
            Self::Local { session, .. } => match session {
                Some(session) => session.send_dtmf(digit, duration_millis),
                None => not_open(session_id, "sendDtmf"),
            },
            Self::Offload { session, .. } => match session {
                Some(session) => log_fault(
                    session_id,
                    "sendDtmf",
                    session.send_dtmf(digit, duration_millis),
                ),
                None => not_open(session_id, "sendDtmf"),
            },
        }
    }

    fn start_dtmf(&self, session_id: i32, digit: char) {
        match self {
            // The local engine has no start/stop pair; a start maps to a
            // fixed-duration send.
            Self::Local { session, .. } => match session {
                Some(session) => session.send_dtmf(digit, DTMF_DEFAULT_DURATION),
                None => not_open(session_id, "startDtmf"),
            },
            Self::Offload { session, .. } => match session {
                Some(session) => log_fault(session_id, "startDtmf", session.start_dtmf(digit)),
                None => not_open(session_id, "startDtmf"),
            },
        }
    }

    /// Offload-only: the local path already sent a bounded tone.
    fn stop_dtmf(&self, session_id: i32) {
        if let Self::Offload { session, .. } = self {
            match session {
                Some(session) => log_fault(session_id, "stopDtmf", session.stop_dtmf()),
                None => not_open(session_id, "stopDtmf"),
            }
        }
    }

    fn send_header_extension(&self, session_id: i32, extensions: &[RtpHeaderExtension]) {
        match self {
            Self::Local { session, .. } => match session {
                Some(session) => session.send_header_extension(extensions),
                None => not_open(session_id, "sendHeaderExtension"),
            },
            Self::Offload { session, .. } => match session {
                Some(session) => {
                    let hal_extensions = extensions
                        .iter()
                        .map(hal_codec::header_extension_to_hal)
                        .collect();
                    log_fault(
                        session_id,
                        "sendHeaderExtension",
                        session.send_header_extension(hal_extensions),
                    );
                }
                None => not_open(session_id, "sendHeaderExtension"),
            },
        }
    }

    fn set_media_quality_threshold(&self, session_id: i32, threshold: &MediaQualityThreshold) {
        match self {
            Self::Local { session, .. } => match session {
                Some(session) => session.set_media_quality_threshold(threshold),
                None => not_open(session_id, "setMediaQualityThreshold"),
            },
            Self::Offload { session, .. } => match session {
                Some(session) => log_fault(
                    session_id,
                    "setMediaQualityThreshold",
                    session.set_media_quality_threshold(hal_codec::threshold_to_hal(Some(
                        threshold,
                    ))),
                ),
                None => not_open(session_id, "setMediaQualityThreshold"),
            },
        }
    }
}

/// Cloneable handle to one audio session dispatcher.
///
/// Every method appends to the session's queue and returns immediately;
/// results, if any, arrive later through the registered
/// [`AudioSessionCallback`].
#[derive(Clone)]
pub struct AudioSession {
    session_id: i32,
    tx: mpsc::UnboundedSender<AudioSessionMessage>,
    offload_listener: Option<Arc<AudioOffloadListener>>,
}

impl fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSession")
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl AudioSession {
    /// Create a dispatcher on the local engine path.
    pub fn local(
        session_id: i32,
        callback: Arc<dyn AudioSessionCallback>,
        service: LocalService,
    ) -> Self {
        Self::spawn_local(session_id, callback, service, None)
    }

    /// Create a dispatcher on the offload HAL path.
    pub fn offload(
        session_id: i32,
        callback: Arc<dyn AudioSessionCallback>,
        service: AudioOffloadService,
    ) -> Self {
        Self::spawn_offload(session_id, callback, service, None)
    }

    pub(crate) fn spawn_local(
        session_id: i32,
        callback: Arc<dyn AudioSessionCallback>,
        service: LocalService,
        on_terminated: TerminationHook,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = Arc::new(AudioListener::new(session_id, tx.clone(), service.bridge()));
        let handle = Self {
            session_id,
            tx,
            offload_listener: None,
        };
        let backend = AudioBackend::Local {
            service,
            listener,
            session: None,
        };
        Self::spawn(handle.clone(), callback, backend, on_terminated, rx);
        handle
    }

    pub(crate) fn spawn_offload(
        session_id: i32,
        callback: Arc<dyn AudioSessionCallback>,
        service: AudioOffloadService,
        on_terminated: TerminationHook,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = Arc::new(AudioOffloadListener::new(session_id, tx.clone()));
        let handle = Self {
            session_id,
            tx,
            offload_listener: Some(listener.clone()),
        };
        let backend = AudioBackend::Offload {
            service,
            listener,
            session: None,
        };
        Self::spawn(handle.clone(), callback, backend, on_terminated, rx);
        handle
    }

    fn spawn(
        handle: AudioSession,
        callback: Arc<dyn AudioSessionCallback>,
        backend: AudioBackend,
        on_terminated: TerminationHook,
        rx: mpsc::UnboundedReceiver<AudioSessionMessage>,
    ) {
        let task = AudioSessionTask {
            session_id: handle.session_id,
            handle,
            callback,
            backend,
            state: SessionState::PendingOpen,
            on_terminated,
        };
        tokio::spawn(task.run(rx));
    }

    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    /// Offload-mode HAL listener, for wiring the HAL callback path.
    pub fn offload_listener(&self) -> Option<Arc<AudioOffloadListener>> {
        self.offload_listener.clone()
    }

    fn send(&self, message: AudioSessionMessage) {
        if self.tx.send(message).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; message dropped"
            );
        }
    }

    // -- application command surface --------------------------------------

    pub fn open_session(&self, params: OpenSessionParams<AudioConfig>) {
        self.send(AudioSessionMessage::Command(AudioCommand::Open(params)));
    }

    pub fn close_session(&self) {
        self.send(AudioSessionMessage::Command(AudioCommand::Close));
    }

    pub fn modify_session(&self, config: AudioConfig) {
        debug!(session_id = self.session_id, "modifySession");
        self.send(AudioSessionMessage::Command(AudioCommand::Modify(config)));
    }

    pub fn add_config(&self, config: AudioConfig) {
        debug!(session_id = self.session_id, "addConfig");
        self.send(AudioSessionMessage::Command(AudioCommand::AddConfig(config)));
    }

    pub fn delete_config(&self, config: AudioConfig) {
        debug!(session_id = self.session_id, "deleteConfig");
        self.send(AudioSessionMessage::Command(AudioCommand::DeleteConfig(
            config,
        )));
    }

    pub fn confirm_config(&self, config: AudioConfig) {
        debug!(session_id = self.session_id, "confirmConfig");
        self.send(AudioSessionMessage::Command(AudioCommand::ConfirmConfig(
            config,
        )));
    }

    pub fn send_dtmf(&self, digit: char, duration_millis: i32) {
        debug!(
            session_id = self.session_id,
            digit = %digit,
            duration_millis,
            "sendDtmf"
        );
        self.send(AudioSessionMessage::Command(AudioCommand::SendDtmf {
            digit,
            duration_millis,
        }));
    }

    pub fn start_dtmf(&self, digit: char) {
        debug!(session_id = self.session_id, digit = %digit, "startDtmf");
        self.send(AudioSessionMessage::Command(AudioCommand::StartDtmf {
            digit,
        }));
    }

    pub fn stop_dtmf(&self) {
        debug!(session_id = self.session_id, "stopDtmf");
        self.send(AudioSessionMessage::Command(AudioCommand::StopDtmf));
    }

    pub fn send_header_extension(&self, extensions: Vec<RtpHeaderExtension>) {
        debug!(session_id = self.session_id, "sendHeaderExtension");
        self.send(AudioSessionMessage::Command(
            AudioCommand::SendHeaderExtension(extensions),
        ));
    }

    pub fn set_media_quality_threshold(&self, threshold: MediaQualityThreshold) {
        debug!(session_id = self.session_id, "setMediaQualityThreshold");
        self.send(AudioSessionMessage::Command(
            AudioCommand::SetMediaQualityThreshold(threshold),
        ));
    }

    // -- event sink (invoked by listeners and by the open result path) ----

    pub fn on_open_session_success(&self, session: OpenedAudioSession) {
        debug!(session_id = self.session_id, "onOpenSessionSuccess");
        self.send(AudioSessionMessage::Event(AudioEvent::OpenSuccess(session)));
    }

    pub fn on_open_session_failure(&self, error: RtpError) {
        debug!(session_id = self.session_id, ?error, "onOpenSessionFailure");
        self.send(AudioSessionMessage::Event(AudioEvent::OpenFailure(error)));
    }

    pub fn on_session_closed(&self) {
        debug!(session_id = self.session_id, "onSessionClosed");
        self.send(AudioSessionMessage::Event(AudioEvent::SessionClosed));
    }
}

/// Queue consumer: owns all mutable session state.
struct AudioSessionTask {
    session_id: i32,
    handle: AudioSession,
    callback: Arc<dyn AudioSessionCallback>,
    backend: AudioBackend,
    state: SessionState,
    on_terminated: TerminationHook,
}

impl AudioSessionTask {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<AudioSessionMessage>) {
        while let Some(message) = rx.recv().await {
            let terminal = match message {
                AudioSessionMessage::Command(command) => self.handle_command(command),
                AudioSessionMessage::Event(event) => self.handle_event(event),
            };
            if terminal {
                self.terminate();
                break;
            }
        }
        debug!(session_id = self.session_id, "audio session task finished");
    }

    fn terminate(&mut self) {
        debug!(
            session_id = self.session_id,
            state = ?self.state,
            "session reached a terminal state"
        );
        self.state = SessionState::Closed;
        self.backend.teardown(self.session_id);
        if let Some(hook) = &self.on_terminated {
            hook(self.session_id);
        }
    }

    fn handle_command(&mut self, command: AudioCommand) -> bool {
        let id = self.session_id;
        match command {
            AudioCommand::Open(params) => self.backend.open(id, params),
            AudioCommand::Close => {
                self.backend.close(id);
                return true;
            }
            AudioCommand::Modify(config) => self.backend.modify(id, &config),
            AudioCommand::AddConfig(config) => self.backend.add_config(id, &config),
            AudioCommand::DeleteConfig(config) => self.backend.delete_config(id, &config),
            AudioCommand::ConfirmConfig(config) => self.backend.confirm_config(id, &config),
            AudioCommand::SendDtmf {
                digit,
                duration_millis,
            } => self.backend.send_dtmf(id, digit, duration_millis),
            AudioCommand::StartDtmf { digit } => self.backend.start_dtmf(id, digit),
            AudioCommand::StopDtmf => self.backend.stop_dtmf(id),
            AudioCommand::SendHeaderExtension(extensions) => {
                self.backend.send_header_extension(id, &extensions)
            }
            AudioCommand::SetMediaQualityThreshold(threshold) => {
                self.backend.set_media_quality_threshold(id, &threshold)
            }
        }
        false
    }

    fn handle_event(&mut self, event: AudioEvent) -> bool {
        match event {
            AudioEvent::OpenSuccess(opened) => {
                self.backend.bind(self.session_id, opened);
                self.state = SessionState::Open;
                self.callback.on_open_session_success(self.handle.clone());
                false
            }
            AudioEvent::OpenFailure(error) => {
                self.callback.on_open_session_failure(error);
                true
            }
            AudioEvent::SessionClosed => {
                self.callback.on_session_closed();
                true
            }
            AudioEvent::ModifyResponse { config, error } => {
                self.callback.on_modify_session_response(config, error);
                false
            }
            AudioEvent::AddConfigResponse { config, error } => {
                self.callback.on_add_config_response(config, error);
                false
            }
            AudioEvent::ConfirmConfigResponse { config, error } => {
                self.callback.on_confirm_config_response(config, error);
                false
            }
            AudioEvent::FirstMediaPacket(config) => {
                self.callback.on_first_media_packet_received(config);
                false
            }
            AudioEvent::HeaderExtension(extensions) => {
                self.callback.on_header_extension_received(extensions);
                false
            }
            AudioEvent::QualityStatus(status) => {
                self.callback.notify_media_quality_status(status);
                false
            }
            AudioEvent::TriggerAnbrQuery(config) => {
                self.callback.trigger_anbr_query(config);
                false
            }
            AudioEvent::DtmfReceived {
                digit,
                duration_millis,
            } => {
                self.callback.on_dtmf_received(digit, duration_millis);
                false
            }
            AudioEvent::CallQualityChanged(quality) => {
                self.callback.on_call_quality_changed(quality);
                false
            }
        }
    }
}

fn not_open(session_id: i32, operation: &str) {
    debug!(
        session_id,
        operation, "no bound session handle; command ignored"
    );
}

fn log_fault(session_id: i32, operation: &str, result: Result<(), HalError>) {
    if let Err(fault) = result {
        error!(session_id, operation, %fault, "hal call failed");
    }
}
