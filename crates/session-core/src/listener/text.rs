//! Text session listener

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use imsmedia_config::RtpError;

use crate::codec::{wire, WireReader};
use crate::error::CodecError;
use crate::local::TextLocalSession;
use crate::native::{NativeBridge, NativeListener};
use crate::session::text::{
    TextEvent, TextSessionMessage, EVENT_MEDIA_INACTIVITY_IND, EVENT_MODIFY_SESSION_RESPONSE,
    EVENT_OPEN_SESSION_FAILURE, EVENT_OPEN_SESSION_SUCCESS, EVENT_RTT_RECEIVED,
    EVENT_SESSION_CLOSED,
};

/// Decodes engine messages for one local text session and feeds the
/// session queue.
pub struct TextListener {
    session_id: i32,
    events: mpsc::UnboundedSender<TextSessionMessage>,
    bridge: Arc<dyn NativeBridge>,
}

impl TextListener {
    pub(crate) fn new(
        session_id: i32,
        events: mpsc::UnboundedSender<TextSessionMessage>,
        bridge: Arc<dyn NativeBridge>,
    ) -> Self {
        Self {
            session_id,
            events,
            bridge,
        }
    }

    fn decode(&self, tag: i32, r: &mut WireReader) -> Result<Option<TextEvent>, CodecError> {
        let event = match tag {
            EVENT_OPEN_SESSION_SUCCESS => {
                TextEvent::OpenSuccess(TextLocalSession::new(self.session_id, self.bridge.clone()))
            }
            EVENT_OPEN_SESSION_FAILURE => TextEvent::OpenFailure(RtpError::from_i32(r.get_i32()?)),
            EVENT_SESSION_CLOSED => TextEvent::SessionClosed,
            EVENT_MODIFY_SESSION_RESPONSE => TextEvent::ModifyResponse {
                error: RtpError::from_i32(r.get_i32()?),
                config: wire::decode_opt_text_config(r)?,
            },
            EVENT_MEDIA_INACTIVITY_IND => TextEvent::MediaInactivity {
                packet_type: r.get_i32()?,
            },
            EVENT_RTT_RECEIVED => TextEvent::RttReceived(r.get_string("rtt_text")?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    fn deliver(&self, event: TextEvent) {
        if self.events.send(TextSessionMessage::Event(event)).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; event dropped"
            );
        }
    }
}

impl NativeListener for TextListener {
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
