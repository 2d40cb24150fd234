//! Video session dispatcher
//!
//! Video sessions run on the local engine only; no offload path exists
//! for them. `send_header_extension` is accepted but unimplemented; the
//! engine has no video header-extension support, so the command is
//! dropped after a debug trace.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use imsmedia_config::{MediaQualityThreshold, RtpError, RtpHeaderExtension, VideoConfig};

use crate::callback::VideoSessionCallback;
use crate::codec::{wire, WireWriter};
use crate::listener::video::VideoListener;
use crate::local::{LocalService, VideoLocalSession};
use crate::session::TerminationHook;
use crate::types::{OpenSessionParams, SessionState, SurfaceHandle};

pub const CMD_OPEN_SESSION: i32 = 101;
pub const CMD_CLOSE_SESSION: i32 = 102;
pub const CMD_MODIFY_SESSION: i32 = 103;
pub const CMD_SET_PREVIEW_SURFACE: i32 = 104;
pub const CMD_SET_DISPLAY_SURFACE: i32 = 105;
pub const CMD_SEND_RTP_HDR_EXTN: i32 = 106;
pub const CMD_SET_MEDIA_QUALITY_THRESHOLD: i32 = 107;
pub const CMD_REQUEST_VIDEO_DATA_USAGE: i32 = 108;

pub const EVENT_OPEN_SESSION_SUCCESS: i32 = 201;
pub const EVENT_OPEN_SESSION_FAILURE: i32 = 202;
pub const EVENT_MODIFY_SESSION_RESPONSE: i32 = 203;
pub const EVENT_FIRST_MEDIA_PACKET_IND: i32 = 204;
pub const EVENT_PEER_DIMENSION_CHANGED: i32 = 205;
pub const EVENT_RTP_HEADER_EXTENSION_IND: i32 = 206;
pub const EVENT_MEDIA_INACTIVITY_IND: i32 = 207;
pub const EVENT_VIDEO_DATA_USAGE_IND: i32 = 208;
pub const EVENT_SESSION_CLOSED: i32 = 209;

#[derive(Debug)]
pub(crate) enum VideoCommand {
    Open(OpenSessionParams<VideoConfig>),
    Close,
    Modify(VideoConfig),
    SetPreviewSurface(SurfaceHandle),
    SetDisplaySurface(SurfaceHandle),
    SendHeaderExtension(Vec<RtpHeaderExtension>),
    SetMediaQualityThreshold(MediaQualityThreshold),
    RequestVideoDataUsage,
}

pub(crate) enum VideoEvent {
    OpenSuccess(VideoLocalSession),
    OpenFailure(RtpError),
    SessionClosed,
    ModifyResponse {
        config: Option<VideoConfig>,
        error: RtpError,
    },
    FirstMediaPacket(Option<VideoConfig>),
    PeerDimensionChanged { width: i32, height: i32 },
    HeaderExtension(Vec<RtpHeaderExtension>),
    MediaInactivity { packet_type: i32 },
    VideoDataUsage(i64),
}

pub(crate) enum VideoSessionMessage {
    Command(VideoCommand),
    Event(VideoEvent),
}

/// Cloneable handle to one video session dispatcher.
#[derive(Clone)]
pub struct VideoSession {
    session_id: i32,
    tx: mpsc::UnboundedSender<VideoSessionMessage>,
}

impl fmt::Debug for VideoSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoSession")
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl VideoSession {
    pub fn local(
        session_id: i32,
        callback: Arc<dyn VideoSessionCallback>,
        service: LocalService,
    ) -> Self {
        Self::spawn_local(session_id, callback, service, None)
    }

    pub(crate) fn spawn_local(
        session_id: i32,
        callback: Arc<dyn VideoSessionCallback>,
        service: LocalService,
        on_terminated: TerminationHook,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = Arc::new(VideoListener::new(session_id, tx.clone(), service.bridge()));
        let handle = Self { session_id, tx };
        let task = VideoSessionTask {
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

    fn send(&self, message: VideoSessionMessage) {
        if self.tx.send(message).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; message dropped"
            );
        }
    }

    // -- application command surface --------------------------------------

    pub fn open_session(&self, params: OpenSessionParams<VideoConfig>) {
        self.send(VideoSessionMessage::Command(VideoCommand::Open(params)));
    }

    pub fn close_session(&self) {
        self.send(VideoSessionMessage::Command(VideoCommand::Close));
    }

    pub fn modify_session(&self, config: VideoConfig) {
        debug!(session_id = self.session_id, "modifySession");
        self.send(VideoSessionMessage::Command(VideoCommand::Modify(config)));
    }

    pub fn set_preview_surface(&self, surface: SurfaceHandle) {
        debug!(session_id = self.session_id, ?surface, "setPreviewSurface");
        self.send(VideoSessionMessage::Command(VideoCommand::SetPreviewSurface(
            surface,
        )));
    }

    pub fn set_display_surface(&self, surface: SurfaceHandle) {
        debug!(session_id = self.session_id, ?surface, "setDisplaySurface");
        self.send(VideoSessionMessage::Command(VideoCommand::SetDisplaySurface(
            surface,
        )));
    }

    pub fn send_header_extension(&self, extensions: Vec<RtpHeaderExtension>) {
        debug!(session_id = self.session_id, "sendHeaderExtension");
        self.send(VideoSessionMessage::Command(
            VideoCommand::SendHeaderExtension(extensions),
        ));
    }

    pub fn set_media_quality_threshold(&self, threshold: MediaQualityThreshold) {
        debug!(session_id = self.session_id, "setMediaQualityThreshold");
        self.send(VideoSessionMessage::Command(
            VideoCommand::SetMediaQualityThreshold(threshold),
        ));
    }

    pub fn request_video_data_usage(&self) {
        debug!(session_id = self.session_id, "requestVideoDataUsage");
        self.send(VideoSessionMessage::Command(
            VideoCommand::RequestVideoDataUsage,
        ));
    }

    // -- event sink --------------------------------------------------------

    pub fn on_open_session_success(&self, session: VideoLocalSession) {
        debug!(session_id = self.session_id, "onOpenSessionSuccess");
        self.send(VideoSessionMessage::Event(VideoEvent::OpenSuccess(session)));
    }

    pub fn on_open_session_failure(&self, error: RtpError) {
        debug!(session_id = self.session_id, ?error, "onOpenSessionFailure");
        self.send(VideoSessionMessage::Event(VideoEvent::OpenFailure(error)));
    }

    pub fn on_session_closed(&self) {
        debug!(session_id = self.session_id, "onSessionClosed");
        self.send(VideoSessionMessage::Event(VideoEvent::SessionClosed));
    }
}

struct VideoSessionTask {
    session_id: i32,
    handle: VideoSession,
    callback: Arc<dyn VideoSessionCallback>,
    service: LocalService,
    listener: Arc<VideoListener>,
    session: Option<VideoLocalSession>,
    state: SessionState,
    on_terminated: TerminationHook,
}

impl VideoSessionTask {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<VideoSessionMessage>) {
        while let Some(message) = rx.recv().await {
            let terminal = match message {
                VideoSessionMessage::Command(command) => self.handle_command(command),
                VideoSessionMessage::Event(event) => self.handle_event(event),
            };
            if terminal {
                self.terminate();
                break;
            }
        }
        debug!(session_id = self.session_id, "video session task finished");
    }

    fn terminate(&mut self) {
        self.state = SessionState::Closed;
        self.service.unregister(self.session_id);
        if let Some(hook) = &self.on_terminated {
            hook(self.session_id);
        }
    }

    fn handle_command(&mut self, command: VideoCommand) -> bool {
        match command {
            VideoCommand::Open(params) => {
                let mut writer = WireWriter::tagged(CMD_OPEN_SESSION);
                wire::encode_opt_video_config(&mut writer, params.rtp_config.as_ref());
                self.service.open_session(
                    self.session_id,
                    self.listener.clone(),
                    params.rtp_socket,
                    params.rtcp_socket,
                    writer.into_bytes(),
                );
                false
            }
            VideoCommand::Close => {
                debug!(session_id = self.session_id, "handleCloseSession");
                self.service.close_session(self.session_id);
                true
            }
            VideoCommand::Modify(config) => {
                match &self.session {
                    Some(session) => session.modify_session(&config),
                    None => self.not_open("modifySession"),
                }
                false
            }
            VideoCommand::SetPreviewSurface(surface) => {
                match &self.session {
                    Some(session) => session.set_preview_surface(surface),
                    None => self.not_open("setPreviewSurface"),
                }
                false
            }
            VideoCommand::SetDisplaySurface(surface) => {
                match &self.session {
                    Some(session) => session.set_display_surface(surface),
                    None => self.not_open("setDisplaySurface"),
                }
                false
            }
            VideoCommand::SendHeaderExtension(_) => {
                // No engine support for video header extensions.
                debug!(
                    session_id = self.session_id,
                    "sendHeaderExtension is not implemented for video sessions"
                );
                false
            }
            VideoCommand::SetMediaQualityThreshold(threshold) => {
                match &self.session {
                    Some(session) => session.set_media_quality_threshold(&threshold),
                    None => self.not_open("setMediaQualityThreshold"),
                }
                false
            }
            VideoCommand::RequestVideoDataUsage => {
                match &self.session {
                    Some(session) => session.request_video_data_usage(),
                    None => self.not_open("requestVideoDataUsage"),
                }
                false
            }
        }
    }

    fn handle_event(&mut self, event: VideoEvent) -> bool {
        match event {
            VideoEvent::OpenSuccess(session) => {
                self.session = Some(session);
                self.state = SessionState::Open;
                self.callback.on_open_session_success(self.handle.clone());
                false
            }
            VideoEvent::OpenFailure(error) => {
                self.callback.on_open_session_failure(error);
                true
            }
            VideoEvent::SessionClosed => {
                self.callback.on_session_closed();
                true
            }
            VideoEvent::ModifyResponse { config, error } => {
                self.callback.on_modify_session_response(config, error);
                false
            }
            VideoEvent::FirstMediaPacket(config) => {
                self.callback.on_first_media_packet_received(config);
                false
            }
            VideoEvent::PeerDimensionChanged { width, height } => {
                self.callback.on_peer_dimension_changed(width, height);
                false
            }
            VideoEvent::HeaderExtension(extensions) => {
                self.callback.on_header_extension_received(extensions);
                false
            }
            VideoEvent::MediaInactivity { packet_type } => {
                self.callback.notify_media_inactivity(packet_type);
                false
            }
            VideoEvent::VideoDataUsage(bytes_used) => {
                self.callback.on_video_data_usage_changed(bytes_used);
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
