//! Real-time text session dispatcher
//!
//! Text sessions run on the local engine only and carry the smallest
//! command set: modify, quality threshold, and outbound RTT text. DTMF
//! is not part of the text surface at all; the absence is structural,
//! not a runtime no-op.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use imsmedia_config::{MediaQualityThreshold, RtpError, TextConfig};

use crate::callback::TextSessionCallback;
use crate::codec::{wire, WireWriter};
use crate::listener::text::TextListener;
use crate::local::{LocalService, TextLocalSession};
use crate::session::TerminationHook;
use crate::types::{OpenSessionParams, SessionState};

pub const CMD_OPEN_SESSION: i32 = 101;
pub const CMD_CLOSE_SESSION: i32 = 102;
pub const CMD_MODIFY_SESSION: i32 = 103;
pub const CMD_SET_MEDIA_QUALITY_THRESHOLD: i32 = 104;
pub const CMD_SEND_RTT: i32 = 105;

pub const EVENT_OPEN_SESSION_SUCCESS: i32 = 201;
pub const EVENT_OPEN_SESSION_FAILURE: i32 = 202;
pub const EVENT_MODIFY_SESSION_RESPONSE: i32 = 203;
pub const EVENT_MEDIA_INACTIVITY_IND: i32 = 204;
pub const EVENT_RTT_RECEIVED: i32 = 205;
pub const EVENT_SESSION_CLOSED: i32 = 206;

#[derive(Debug)]
pub(crate) enum TextCommand {
    Open(OpenSessionParams<TextConfig>),
    Close,
    Modify(TextConfig),
    SetMediaQualityThreshold(MediaQualityThreshold),
    SendRtt(String),
}

pub(crate) enum TextEvent {
    OpenSuccess(TextLocalSession),
    OpenFailure(RtpError),
    SessionClosed,
    ModifyResponse {
        config: Option<TextConfig>,
        error: RtpError,
    },
    MediaInactivity { packet_type: i32 },
    RttReceived(String),
}

pub(crate) enum TextSessionMessage {
    Command(TextCommand),
    Event(TextEvent),
}

/// Cloneable handle to one text session dispatcher.
#[derive(Clone)]
pub struct TextSession {
    session_id: i32,
    tx: mpsc::UnboundedSender<TextSessionMessage>,
}

impl fmt::Debug for TextSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSession")
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl TextSession {
    pub fn local(
        session_id: i32,
        callback: Arc<dyn TextSessionCallback>,
        service: LocalService,
    ) -> Self {
        Self::spawn_local(session_id, callback, service, None)
    }

    pub(crate) fn spawn_local(
        session_id: i32,
        callback: Arc<dyn TextSessionCallback>,
        service: LocalService,
        on_terminated: TerminationHook,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = Arc::new(TextListener::new(session_id, tx.clone(), service.bridge()));
        let handle = Self { session_id, tx };
        let task = TextSessionTask {
            session_id,
            handle: handle.clone(),
            callback,
            service,
            listener,
            session: None,
            state: SessionState::PendingOpen,
            on_terminated,
        };
        tokio::spawn(task.run(rx));
        handle
    }

    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    fn send(&self, message: TextSessionMessage) {
        if self.tx.send(message).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; message dropped"
            );
        }
    }

    // -- application command surface --------------------------------------

    pub fn open_session(&self, params: OpenSessionParams<TextConfig>) {
        self.send(TextSessionMessage::Command(TextCommand::Open(params)));
    }

    pub fn close_session(&self) {
        self.send(TextSessionMessage::Command(TextCommand::Close));
    }

    pub fn modify_session(&self, config: TextConfig) {
        debug!(session_id = self.session_id, "modifySession");
        self.send(TextSessionMessage::Command(TextCommand::Modify(config)));
    }

    pub fn set_media_quality_threshold(&self, threshold: MediaQualityThreshold) {
        debug!(session_id = self.session_id, "setMediaQualityThreshold");
        self.send(TextSessionMessage::Command(
            TextCommand::SetMediaQualityThreshold(threshold),
        ));
    }

    pub fn send_rtt(&self, rtt_text: impl Into<String>) {
        debug!(session_id = self.session_id, "sendRtt");
        self.send(TextSessionMessage::Command(TextCommand::SendRtt(
            rtt_text.into(),
        )));
    }

    // -- event sink --------------------------------------------------------

    pub fn on_open_session_success(&self, session: TextLocalSession) {
        debug!(session_id = self.session_id, "onOpenSessionSuccess");
        self.send(TextSessionMessage::Event(TextEvent::OpenSuccess(session)));
    }

    pub fn on_open_session_failure(&self, error: RtpError) {
        debug!(session_id = self.session_id, ?error, "onOpenSessionFailure");
        self.send(TextSessionMessage::Event(TextEvent::OpenFailure(error)));
    }

    pub fn on_session_closed(&self) {
        debug!(session_id = self.session_id, "onSessionClosed");
        self.send(TextSessionMessage::Event(TextEvent::SessionClosed));
    }
}

struct TextSessionTask {
    session_id: i32,
    handle: TextSession,
    callback: Arc<dyn TextSessionCallback>,
    service: LocalService,
    listener: Arc<TextListener>,
    session: Option<TextLocalSession>,
    state: SessionState,
    on_terminated: TerminationHook,
}

impl TextSessionTask {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<TextSessionMessage>) {
        while let Some(message) = rx.recv().await {
            let terminal = match message {
                TextSessionMessage::Command(command) => self.handle_command(command),
                TextSessionMessage::Event(event) => self.handle_event(event),
            };
            if terminal {
                self.terminate();
                break;
            }
        }
        debug!(session_id = self.session_id, "text session task finished");
    }

    fn terminate(&mut self) {
        self.state = SessionState::Closed;
        self.service.unregister(self.session_id);
        if let Some(hook) = &self.on_terminated {
            hook(self.session_id);
        }
    }

    fn handle_command(&mut self, command: TextCommand) -> bool {
        match command {
            TextCommand::Open(params) => {
                let mut writer = WireWriter::tagged(CMD_OPEN_SESSION);
                wire::encode_opt_text_config(&mut writer, params.rtp_config.as_ref());
                self.service.open_session(
                    self.session_id,
                    self.listener.clone(),
                    params.rtp_socket,
                    params.rtcp_socket,
                    writer.into_bytes(),
                );
                false
            }
            TextCommand::Close => {
                debug!(session_id = self.session_id, "handleCloseSession");
                self.service.close_session(self.session_id);
                true
            }
            TextCommand::Modify(config) => {
                match &self.session {
                    Some(session) => session.modify_session(&config),
                    None => self.not_open("modifySession"),
                }
                false
            }
            TextCommand::SetMediaQualityThreshold(threshold) => {
                match &self.session {
                    Some(session) => session.set_media_quality_threshold(&threshold),
                    None => self.not_open("setMediaQualityThreshold"),
                }
                false
            }
            TextCommand::SendRtt(rtt_text) => {
                match &self.session {
                    Some(session) => session.send_rtt(&rtt_text),
                    None => self.not_open("sendRtt"),
                }
                false
            }
        }
    }

    fn handle_event(&mut self, event: TextEvent) -> bool {
        match event {
            TextEvent::OpenSuccess(session) => {
                self.session = Some(session);
                self.state = SessionState::Open;
                self.callback.on_open_session_success(self.handle.clone());
                false
            }
            TextEvent::OpenFailure(error) => {
                self.callback.on_open_session_failure(error);
                true
            }
            TextEvent::SessionClosed => {
                self.callback.on_session_closed();
                true
            }
            TextEvent::ModifyResponse { config, error } => {
                self.callback.on_modify_session_response(config, error);
                false
            }
            TextEvent::MediaInactivity { packet_type } => {
                self.callback.notify_media_inactivity(packet_type);
                false
            }
            TextEvent::RttReceived(rtt_text) => {
                self.callback.on_rtt_received(rtt_text);
                false
            }
        }
    }

    fn not_open(&self, operation: &str) {
        debug!(
            session_id = self.session_id,
            operation,
            state = ?self.state,
            "no bound session handle; command ignored"
        );
    }
}
