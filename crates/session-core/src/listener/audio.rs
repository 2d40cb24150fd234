//! Audio session listeners (local and offload)

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use imsmedia_config::RtpError;

use crate::codec::hal as hal_codec;
use crate::codec::{wire, WireReader};
use crate::error::CodecError;
use crate::hal::{self, HalSessionListener};
use crate::local::AudioLocalSession;
use crate::native::{NativeBridge, NativeListener};
use crate::session::audio::{
    AudioEvent, AudioSessionMessage, OpenedAudioSession, EVENT_ADD_CONFIG_RESPONSE,
    EVENT_CALL_QUALITY_CHANGE_IND, EVENT_CONFIRM_CONFIG_RESPONSE, EVENT_DTMF_RECEIVED_IND,
    EVENT_FIRST_MEDIA_PACKET_IND, EVENT_MEDIA_QUALITY_STATUS_IND, EVENT_MODIFY_SESSION_RESPONSE,
    EVENT_OPEN_SESSION_FAILURE, EVENT_OPEN_SESSION_SUCCESS, EVENT_RTP_HEADER_EXTENSION_IND,
    EVENT_SESSION_CLOSED, EVENT_TRIGGER_ANBR_QUERY_IND,
};

/// Decodes engine messages for one local audio session and feeds the
/// session queue.
pub struct AudioListener {
    session_id: i32,
    events: mpsc::UnboundedSender<AudioSessionMessage>,
    bridge: Arc<dyn NativeBridge>,
}

impl AudioListener {
    pub(crate) fn new(
        session_id: i32,
        events: mpsc::UnboundedSender<AudioSessionMessage>,
        bridge: Arc<dyn NativeBridge>,
    ) -> Self {
        Self {
            session_id,
            events,
            bridge,
        }
    }

    fn decode(&self, tag: i32, r: &mut WireReader) -> Result<Option<AudioEvent>, CodecError> {
        let event = match tag {
            EVENT_OPEN_SESSION_SUCCESS => {
                // The engine session now exists; build the runtime handle
                // the dispatcher will bind.
                let local = AudioLocalSession::new(self.session_id, self.bridge.clone());
                AudioEvent::OpenSuccess(OpenedAudioSession::Local(local))
            }
            EVENT_OPEN_SESSION_FAILURE => {
                AudioEvent::OpenFailure(RtpError::from_i32(r.get_i32()?))
            }
            EVENT_SESSION_CLOSED => AudioEvent::SessionClosed,
            EVENT_MODIFY_SESSION_RESPONSE => AudioEvent::ModifyResponse {
                error: RtpError::from_i32(r.get_i32()?),
                config: wire::decode_opt_audio_config(r)?,
            },
            EVENT_ADD_CONFIG_RESPONSE => AudioEvent::AddConfigResponse {
                error: RtpError::from_i32(r.get_i32()?),
                config: wire::decode_opt_audio_config(r)?,
            },
            EVENT_CONFIRM_CONFIG_RESPONSE => AudioEvent::ConfirmConfigResponse {
                error: RtpError::from_i32(r.get_i32()?),
                config: wire::decode_opt_audio_config(r)?,
            },
            EVENT_FIRST_MEDIA_PACKET_IND => {
                AudioEvent::FirstMediaPacket(wire::decode_opt_audio_config(r)?)
            }
            EVENT_RTP_HEADER_EXTENSION_IND => {
                AudioEvent::HeaderExtension(wire::decode_header_extensions(r)?)
            }
            EVENT_MEDIA_QUALITY_STATUS_IND => {
                AudioEvent::QualityStatus(wire::decode_media_quality_status(r)?)
            }
            EVENT_TRIGGER_ANBR_QUERY_IND => {
                AudioEvent::TriggerAnbrQuery(wire::decode_opt_audio_config(r)?)
            }
            EVENT_DTMF_RECEIVED_IND => AudioEvent::DtmfReceived {
                digit: r.get_u8()? as char,
                duration_millis: r.get_i32()?,
            },
            EVENT_CALL_QUALITY_CHANGE_IND => {
                AudioEvent::CallQualityChanged(wire::decode_call_quality(r)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    fn deliver(&self, event: AudioEvent) {
        if self.events.send(AudioSessionMessage::Event(event)).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; event dropped"
            );
        }
    }
}

impl NativeListener for AudioListener {
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

/// Converts HAL callbacks for one offload audio session and feeds the
/// session queue.
pub struct AudioOffloadListener {
    session_id: i32,
    events: mpsc::UnboundedSender<AudioSessionMessage>,
}

impl AudioOffloadListener {
    pub(crate) fn new(
        session_id: i32,
        events: mpsc::UnboundedSender<AudioSessionMessage>,
    ) -> Self {
        Self { session_id, events }
    }

    fn deliver(&self, event: AudioEvent) {
        if self.events.send(AudioSessionMessage::Event(event)).is_err() {
            debug!(
                session_id = self.session_id,
                "session is terminated; event dropped"
            );
        }
    }
}

impl HalSessionListener for AudioOffloadListener {
    fn on_modify_session_response(&self, config: Option<hal::RtpConfig>, error: i32) {
        self.deliver(AudioEvent::ModifyResponse {
            config: hal_codec::hal_to_audio_config(config.as_ref()),
            error: RtpError::from_i32(error),
        });
    }

    fn on_first_media_packet_received(&self, config: Option<hal::RtpConfig>) {
        self.deliver(AudioEvent::FirstMediaPacket(hal_codec::hal_to_audio_config(
            config.as_ref(),
        )));
    }

    fn on_header_extension_received(&self, extensions: Vec<hal::RtpHeaderExtension>) {
        self.deliver(AudioEvent::HeaderExtension(
            extensions
                .iter()
                .map(hal_codec::hal_to_header_extension)
                .collect(),
        ));
    }

    fn notify_media_quality_status(&self, status: hal::MediaQualityStatus) {
        self.deliver(AudioEvent::QualityStatus(hal_codec::hal_to_status(&status)));
    }

    fn trigger_anbr_query(&self, config: Option<hal::RtpConfig>) {
        self.deliver(AudioEvent::TriggerAnbrQuery(hal_codec::hal_to_audio_config(
            config.as_ref(),
        )));
    }

    fn on_dtmf_received(&self, digit: char, duration_millis: i32) {
        self.deliver(AudioEvent::DtmfReceived {
            digit,
            duration_millis,
        });
    }

    fn on_call_quality_changed(&self, quality: hal::CallQuality) {
        self.deliver(AudioEvent::CallQualityChanged(
            hal_codec::hal_to_call_quality(&quality),
        ));
    }

    fn on_session_closed(&self) {
        self.deliver(AudioEvent::SessionClosed);
    }
}
