//! Offload HAL surface
//!
//! Structured argument types and the trait seams for the hardware
//! offload path. The real implementation lives in a separate HAL
//! process behind an RPC transport; this module only defines the shapes
//! that cross it. Every call can fail with a [`HalError`] transport
//! fault, which callers catch and log without crashing the dispatcher.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// Remote RTP endpoint in HAL form: a printable address plus port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtpAddress {
    pub ip_address: String,
    pub port_number: u16,
}

/// DTMF payload parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DtmfParams {
    pub tx_payload_type_number: u8,
    pub rx_payload_type_number: u8,
    pub sampling_rate_khz: u8,
}

/// AMR codec parameters in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmrParams {
    pub amr_mode: i32,
    pub octet_aligned: bool,
    pub max_redundancy_millis: i32,
}

/// EVS codec parameters in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvsParams {
    pub bandwidth: i32,
    pub evs_mode: i32,
    pub channel_aware_mode: u8,
    pub use_header_full_only: bool,
    pub codec_mode_request: u8,
}

/// Codec-specific parameter union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecSpecificParams {
    Amr(AmrParams),
    Evs(EvsParams),
}

/// Codec parameters common to every audio codec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodecParams {
    pub codec_type: i32,
    pub rx_payload_type_number: u8,
    pub tx_payload_type_number: u8,
    pub sampling_rate_khz: u8,
    pub dtx_enabled: bool,
    pub codec_specific_params: Option<CodecSpecificParams>,
}

/// Session-scoped parameters (packetization, QoS, DTMF, codec).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtpSessionParams {
    pub ptime_millis: u8,
    pub max_ptime_millis: u8,
    pub dscp: u8,
    pub dtmf_params: Option<DtmfParams>,
    pub codec_params: Option<CodecParams>,
}

/// RTCP settings in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtcpConfig {
    pub canonical_name: String,
    pub transmit_port: u16,
    pub transmit_interval_sec: i32,
    pub rtcp_xr_blocks: i32,
}

/// Complete session configuration in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtpConfig {
    pub direction: i32,
    pub access_network: i32,
    pub remote_address: Option<RtpAddress>,
    pub session_params: Option<RtpSessionParams>,
    pub rtcp_config: Option<RtcpConfig>,
}

/// Quality threshold in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaQualityThreshold {
    pub rtp_inactivity_timer_millis: Vec<i32>,
    pub rtcp_inactivity_timer_millis: i32,
    pub rtp_hysteresis_time_millis: i32,
    pub rtp_packet_loss_duration_millis: i32,
    pub rtp_packet_loss_rate: Vec<i32>,
    pub rtp_jitter_millis: Vec<i32>,
    pub notify_current_status: bool,
}

/// Quality status report in HAL form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaQualityStatus {
    pub rtp_inactivity_time_millis: i32,
    pub rtcp_inactivity_time_millis: i32,
    pub rtp_packet_loss_rate: i32,
    pub rtp_jitter_millis: i32,
}

/// RTP header extension in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtpHeaderExtension {
    pub local_id: u8,
    pub data: Vec<u8>,
}

/// Call quality metrics in HAL form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallQuality {
    pub downlink_call_quality_level: i32,
    pub uplink_call_quality_level: i32,
    pub call_duration: i32,
    pub num_rtp_packets_transmitted: i32,
    pub num_rtp_packets_received: i32,
    pub num_rtp_packets_transmitted_lost: i32,
    pub num_rtp_packets_not_received: i32,
    pub average_relative_jitter: i32,
    pub max_relative_jitter: i32,
    pub average_round_trip_time: i32,
    pub codec_type: i32,
    pub rtp_inactivity_detected: bool,
    pub rx_silence_detected: bool,
    pub tx_silence_detected: bool,
    pub num_voice_frames: i32,
    pub num_no_data_frames: i32,
    pub num_dropped_rtp_packets: i32,
    pub min_playout_delay_millis: i32,
    pub max_playout_delay_millis: i32,
    pub num_rtp_sid_packets_received: i32,
    pub num_rtp_duplicate_packets: i32,
}

/// Entry point into the offload HAL process.
///
/// Mirrors the top-level media RPC interface: sessions are opened and
/// closed by id; everything else happens on the per-session object
/// returned asynchronously through the open callback path.
pub trait MediaHal: Send + Sync {
    /// Ask the HAL to create a session. The result arrives later as an
    /// open-success (carrying a [`HalMediaSession`]) or open-failure
    /// event on the owning dispatcher's queue.
    fn open_session(&self, session_id: i32, config: Option<RtpConfig>) -> Result<(), HalError>;

    /// Tear down the HAL session with the given id.
    fn close_session(&self, session_id: i32) -> Result<(), HalError>;
}

/// Per-session RPC surface exposed by the HAL once a session is open.
pub trait HalMediaSession: Send + Sync {
    fn set_listener(&self, listener: Arc<dyn HalSessionListener>) -> Result<(), HalError>;
    fn modify_session(&self, config: Option<RtpConfig>) -> Result<(), HalError>;
    fn send_dtmf(&self, digit: char, duration_millis: i32) -> Result<(), HalError>;
    fn start_dtmf(&self, digit: char) -> Result<(), HalError>;
    fn stop_dtmf(&self) -> Result<(), HalError>;
    fn send_header_extension(&self, extensions: Vec<RtpHeaderExtension>) -> Result<(), HalError>;
    fn set_media_quality_threshold(
        &self,
        threshold: Option<MediaQualityThreshold>,
    ) -> Result<(), HalError>;
}

/// Asynchronous callback surface the HAL invokes on its own threads.
///
/// Implementations must not block the HAL delivery thread; the offload
/// listener only converts the payload and appends it to the session
/// queue.
pub trait HalSessionListener: Send + Sync {
    fn on_modify_session_response(&self, config: Option<RtpConfig>, error: i32);
    fn on_first_media_packet_received(&self, config: Option<RtpConfig>);
    fn on_header_extension_received(&self, extensions: Vec<RtpHeaderExtension>);
    fn notify_media_quality_status(&self, status: MediaQualityStatus);
    fn trigger_anbr_query(&self, config: Option<RtpConfig>);
    fn on_dtmf_received(&self, digit: char, duration_millis: i32);
    fn on_call_quality_changed(&self, quality: CallQuality);
    fn on_session_closed(&self);
}
