//! Video session listener

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use imsmedia_config::RtpError;

use crate::codec::{wire, WireReader};
use crate::error::CodecError;
use crate::local::VideoLocalSession;
use crate::native::{NativeBridge, NativeListener};
use crate::session::video::{
    VideoEvent, VideoSessionMessage, EVENT_FIRST_MEDIA_PACKET_IND, EVENT_MEDIA_INACTIVITY_IND,
    EVENT_MODIFY_SESSION_RESPONSE, EVENT_OPEN_SESSION_FAILURE, EVENT_OPEN_SESSION_SUCCESS,
    EVENT_PEER_DIMENSION_CHANGED, EVENT_RTP_HEADER_EXTENSION_IND, EVENT_SESSION_CLOSED,
    EVENT_VIDEO_DATA_USAGE_IND,
};

/// Decodes engine messages for one local video session and feeds the
/// session queue.
pub struct VideoListener {
    session_id: i32,
    events: mpsc::UnboundedSender<VideoSessionMessage>,
    bridge: Arc<dyn NativeBridge>,
}

impl VideoListener {
    pub(crate) fn new(
        session_id: i32,
        events: mpsc::UnboundedSender<VideoSessionMessage>,
        bridge: Arc<dyn NativeBridge>,
    ) -> Self {
        Self {
            session_id,
            events,
            bridge,
        }
    }

    fn decode(&self, tag: i32, r: &mut WireReader) -> Result<Option<VideoEvent>, CodecError> {
        let event = match tag {
            EVENT_OPEN_SESSION_SUCCESS => VideoEvent::OpenSuccess(VideoLocalSession::new(
                self.session_id,
                self.bridge.clone(),
            )),
            EVENT_OPEN_SESSION_FAILURE => {
                VideoEvent::OpenFailure(RtpError::from_i32(r.get_i32()?))
            }
            EVENT_SESSION_CLOSED => VideoEvent::SessionClosed,
            EVENT_MODIFY_SESSION_RESPONSE => VideoEvent::ModifyResponse {
                error: RtpError::from_i32(r.get_i32()?),
                config: wire::decode_opt_video_config(r)?,
            },
            EVENT_FIRST_MEDIA_PACKET_IND => {
                VideoEvent::FirstMediaPacket(wire::decode_opt_video_config(r)?)
            }
            EVENT_PEER_DIMENSION_CHANGED => VideoEvent::PeerDimensionChanged {
                width: r.get_i32()?,
                height: r.get_i32()?,
            },
            EVENT_RTP_HEADER_EXTENSION_IND => {
                VideoEvent::HeaderExtension(wire::decode_header_extensions(r)?)
            }
            EVENT_MEDIA_INACTIVITY_IND => VideoEvent::MediaInactivity {
                packet_type: r.get_i32()?,
            },
            EVENT_VIDEO_DATA_USAGE_IND => VideoEvent::VideoDataUsage(r.get_i64()?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    fn deliver(&self, event: VideoEvent) {
        if self.events.send(VideoSessionMessage::Event(event)).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; event dropped"
            );
        }
    }
}

impl NativeListener for VideoListener {
    fn on_message(&self, message: Bytes) {
        let mut reader = WireReader::new(message);
        let tag = match reader.get_i32() {
            Ok(tag) => tag,
            Err(error) => {
                debug!(session_id = self.session_id, %error, "dropping unframed message");
                return;
            }
        };
        match self.decode(tag, &mut reader) {
            Ok(Some(event)) => self.deliver(event),
            Ok(None) => debug!(
                session_id = self.session_id,
                tag, "ignoring unrecognized event"
            ),
            Err(error) => debug!(
                session_id = self.session_id,
                tag, %error, "dropping undecodable event"
            ),
        }
    }
}
