//! Application-facing session callbacks
//!
//! One trait per media type, mirroring the asynchronous result surface:
//! commands are fire-and-forget, and everything the application ever
//! learns about a session arrives through these methods on the
//! session's own consumer task. All methods default to no-ops so
//! implementors only write the ones they care about.

use imsmedia_config::{
    AudioConfig, CallQuality, MediaQualityStatus, RtpError, RtpHeaderExtension, TextConfig,
    VideoConfig,
};

use crate::session::audio::AudioSession;
use crate::session::text::TextSession;
use crate::session::video::VideoSession;

/// Callback surface of an audio session.
pub trait AudioSessionCallback: Send + Sync {
    /// The session is open; `session` is the dispatcher handle all
    /// further commands go through.
    fn on_open_session_success(&self, session: AudioSession) {
        let _ = session;
    }

    fn on_open_session_failure(&self, error: RtpError) {
        let _ = error;
    }

    fn on_session_closed(&self) {}

    fn on_modify_session_response(&self, config: Option<AudioConfig>, error: RtpError) {
        let _ = (config, error);
    }

    fn on_add_config_response(&self, config: Option<AudioConfig>, error: RtpError) {
        let _ = (config, error);
    }

    fn on_confirm_config_response(&self, config: Option<AudioConfig>, error: RtpError) {
        let _ = (config, error);
    }

    fn on_first_media_packet_received(&self, config: Option<AudioConfig>) {
        let _ = config;
    }

    fn on_header_extension_received(&self, extensions: Vec<RtpHeaderExtension>) {
        let _ = extensions;
    }

    fn notify_media_quality_status(&self, status: MediaQualityStatus) {
        let _ = status;
    }

    /// The network asks the device to query a new bitrate (ANBR).
    fn trigger_anbr_query(&self, config: Option<AudioConfig>) {
        let _ = config;
    }

    fn on_dtmf_received(&self, digit: char, duration_millis: i32) {
        let _ = (digit, duration_millis);
    }

    fn on_call_quality_changed(&self, quality: CallQuality) {
        let _ = quality;
    }
}

/// Callback surface of a video session.
pub trait VideoSessionCallback: Send + Sync {
    fn on_open_session_success(&self, session: VideoSession) {
        let _ = session;
    }

    fn on_open_session_failure(&self, error: RtpError) {
        let _ = error;
    }

    fn on_session_closed(&self) {}

    fn on_modify_session_response(&self, config: Option<VideoConfig>, error: RtpError) {
        let _ = (config, error);
    }

    fn on_first_media_packet_received(&self, config: Option<VideoConfig>) {
        let _ = config;
    }

    /// The remote end changed its encoded resolution.
    fn on_peer_dimension_changed(&self, width: i32, height: i32) {
        let _ = (width, height);
    }

    fn on_header_extension_received(&self, extensions: Vec<RtpHeaderExtension>) {
        let _ = extensions;
    }

    fn notify_media_inactivity(&self, packet_type: i32) {
        let _ = packet_type;
    }

    /// Aggregate bytes consumed by the video stream, in response to
    /// `request_video_data_usage`.
    fn on_video_data_usage_changed(&self, bytes_used: i64) {
        let _ = bytes_used;
    }
}

/// Callback surface of a real-time text session.
pub trait TextSessionCallback: Send + Sync {
    fn on_open_session_success(&self, session: TextSession) {
        let _ = session;
    }

    fn on_open_session_failure(&self, error: RtpError) {
        let _ = error;
    }

    fn on_session_closed(&self) {}

    fn on_modify_session_response(&self, config: Option<TextConfig>, error: RtpError) {
        let _ = (config, error);
    }

    fn notify_media_inactivity(&self, packet_type: i32) {
        let _ = packet_type;
    }

    fn on_rtt_received(&self, rtt_text: String) {
        let _ = rtt_text;
    }
}
