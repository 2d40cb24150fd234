//! Local execution path
//!
//! Thin shims over the [`NativeBridge`]: the [`LocalService`] owns
//! session setup/teardown against the engine, and the per-media-type
//! local session handles encode commands into the flat wire form and
//! push them through the bridge. A send failure is logged and swallowed;
//! the application observes nothing (the native path has no synchronous
//! error surface).

use std::net::UdpSocket;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use imsmedia_config::{
    AudioConfig, MediaQualityThreshold, RtpHeaderExtension, TextConfig, VideoConfig,
};

use crate::codec::{wire, WireWriter};
use crate::native::{ListenerRegistry, NativeBridge, NativeListener};
use crate::session::{audio, text, video};
use crate::types::SurfaceHandle;

/// Entry point to the in-process native engine for one session's
/// lifetime operations.
#[derive(Clone)]
pub struct LocalService {
    bridge: Arc<dyn NativeBridge>,
    listeners: Arc<ListenerRegistry>,
}

impl LocalService {
    pub fn new(bridge: Arc<dyn NativeBridge>, listeners: Arc<ListenerRegistry>) -> Self {
        Self { bridge, listeners }
    }

    pub fn bridge(&self) -> Arc<dyn NativeBridge> {
        self.bridge.clone()
    }

    /// Install the session's listener and ask the engine to create the
    /// session. The open result arrives later through the listener.
    pub fn open_session(
        &self,
        session_id: i32,
        listener: Arc<dyn NativeListener>,
        rtp_socket: Option<UdpSocket>,
        rtcp_socket: Option<UdpSocket>,
        message: Bytes,
    ) {
        self.listeners.register(session_id, listener);
        if let Err(error) = self
            .bridge
            .open_session(session_id, rtp_socket, rtcp_socket, message)
        {
            warn!(session_id, %error, "native openSession failed");
        }
    }

    /// Tear down the engine session and drop its listener entry.
    pub fn close_session(&self, session_id: i32) {
        debug!(session_id, "closing native session");
        self.bridge.close_session(session_id);
        self.listeners.unregister(session_id);
    }

    /// Drop the listener entry without touching the engine (terminal
    /// event cleanup where the engine side is already gone).
    pub fn unregister(&self, session_id: i32) {
        self.listeners.unregister(session_id);
    }
}

fn send(bridge: &Arc<dyn NativeBridge>, session_id: i32, operation: &str, writer: WireWriter) {
    if let Err(error) = bridge.send_message(session_id, writer.into_bytes()) {
        warn!(session_id, operation, %error, "native send failed");
    }
}

/// Runtime handle to an open local audio session.
///
/// Constructed by the listener on open-success and bound into the
/// dispatcher; every method is one encoded message into the engine.
#[derive(Clone)]
pub struct AudioLocalSession {
    session_id: i32,
    bridge: Arc<dyn NativeBridge>,
}

impl AudioLocalSession {
    pub fn new(session_id: i32, bridge: Arc<dyn NativeBridge>) -> Self {
        Self { session_id, bridge }
    }

    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    pub fn modify_session(&self, config: &AudioConfig) {
        let mut writer = WireWriter::tagged(audio::CMD_MODIFY_SESSION);
        wire::encode_audio_config(&mut writer, config);
        send(&self.bridge, self.session_id, "modifySession", writer);
    }

    pub fn add_config(&self, config: &AudioConfig) {
        let mut writer = WireWriter::tagged(audio::CMD_ADD_CONFIG);
        wire::encode_audio_config(&mut writer, config);
        send(&self.bridge, self.session_id, "addConfig", writer);
    }

    pub fn delete_config(&self, config: &AudioConfig) {
        let mut writer = WireWriter::tagged(audio::CMD_DELETE_CONFIG);
        wire::encode_audio_config(&mut writer, config);
        send(&self.bridge, self.session_id, "deleteConfig", writer);
    }

    pub fn confirm_config(&self, config: &AudioConfig) {
        let mut writer = WireWriter::tagged(audio::CMD_CONFIRM_CONFIG);
        wire::encode_audio_config(&mut writer, config);
        send(&self.bridge, self.session_id, "confirmConfig", writer);
    }

    pub fn send_dtmf(&self, digit: char, duration_millis: i32) {
        let mut writer = WireWriter::tagged(audio::CMD_SEND_DTMF);
        writer.put_u8(digit as u8);
        writer.put_i32(duration_millis);
        send(&self.bridge, self.session_id, "sendDtmf", writer);
    }

    pub fn send_header_extension(&self, extensions: &[RtpHeaderExtension]) {
        let mut writer = WireWriter::tagged(audio::CMD_SEND_RTP_HDR_EXTN);
        wire::encode_header_extensions(&mut writer, extensions);
        send(&self.bridge, self.session_id, "sendHeaderExtension", writer);
    }

    pub fn set_media_quality_threshold(&self, threshold: &MediaQualityThreshold) {
        let mut writer = WireWriter::tagged(audio::CMD_SET_MEDIA_QUALITY_THRESHOLD);
        wire::encode_media_quality_threshold(&mut writer, threshold);
        send(
            &self.bridge,
            self.session_id,
            "setMediaQualityThreshold",
            writer,
        );
    }
}

/// Runtime handle to an open local video session.
#[derive(Clone)]
pub struct VideoLocalSession {
    session_id: i32,
    bridge: Arc<dyn NativeBridge>,
}

impl VideoLocalSession {
    pub fn new(session_id: i32, bridge: Arc<dyn NativeBridge>) -> Self {
        Self { session_id, bridge }
    }

    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    pub fn modify_session(&self, config: &VideoConfig) {
        let mut writer = WireWriter::tagged(video::CMD_MODIFY_SESSION);
        wire::encode_video_config(&mut writer, config);
        send(&self.bridge, self.session_id, "modifySession", writer);
    }

    pub fn set_preview_surface(&self, surface: SurfaceHandle) {
        let mut writer = WireWriter::tagged(video::CMD_SET_PREVIEW_SURFACE);
        writer.put_u64(surface.0);
        send(&self.bridge, self.session_id, "setPreviewSurface", writer);
    }

    pub fn set_display_surface(&self, surface: SurfaceHandle) {
        let mut writer = WireWriter::tagged(video::CMD_SET_DISPLAY_SURFACE);
        writer.put_u64(surface.0);
        send(&self.bridge, self.session_id, "setDisplaySurface", writer);
    }

    pub fn set_media_quality_threshold(&self, threshold: &MediaQualityThreshold) {
        let mut writer = WireWriter::tagged(video::CMD_SET_MEDIA_QUALITY_THRESHOLD);
        wire::encode_media_quality_threshold(&mut writer, threshold);
        send(
            &self.bridge,
            self.session_id,
            "setMediaQualityThreshold",
            writer,
        );
    }

    pub fn request_video_data_usage(&self) {
        let writer = WireWriter::tagged(video::CMD_REQUEST_VIDEO_DATA_USAGE);
        send(&self.bridge, self.session_id, "requestVideoDataUsage", writer);
    }
}

/// Runtime handle to an open local text session.
#[derive(Clone)]
pub struct TextLocalSession {
    session_id: i32,
    bridge: Arc<dyn NativeBridge>,
}

impl TextLocalSession {
    pub fn new(session_id: i32, bridge: Arc<dyn NativeBridge>) -> Self {
        Self { session_id, bridge }
    }

    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    pub fn modify_session(&self, config: &TextConfig) {
        let mut writer = WireWriter::tagged(text::CMD_MODIFY_SESSION);
        wire::encode_text_config(&mut writer, config);
        send(&self.bridge, self.session_id, "modifySession", writer);
    }

    pub fn set_media_quality_threshold(&self, threshold: &MediaQualityThreshold) {
        let mut writer = WireWriter::tagged(text::CMD_SET_MEDIA_QUALITY_THRESHOLD);
        wire::encode_media_quality_threshold(&mut writer, threshold);
        send(
            &self.bridge,
            self.session_id,
            "setMediaQualityThreshold",
            writer,
        );
    }

    pub fn send_rtt(&self, rtt_text: &str) {
        let mut writer = WireWriter::tagged(text::CMD_SEND_RTT);
        writer.put_string(rtt_text);
        send(&self.bridge, self.session_id, "sendRtt", writer);
    }
}
