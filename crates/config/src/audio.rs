//! Audio session configuration
//!
//! [`AudioConfig`] describes one audio RTP flow: remote endpoint, codec
//! selection, payload type numbers, DTMF settings and the optional
//! AMR/EVS codec-specific parameter blocks.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::rtcp::RtcpConfig;
use crate::types::{AccessNetwork, MediaDirection};

/// AMR (adaptive multi-rate) codec parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmrParams {
    /// Bitmask of negotiated AMR modes (`AMR_MODE_*`)
    pub amr_mode: i32,
    /// True for octet-aligned payload framing, false for bandwidth-efficient
    pub octet_aligned: bool,
    /// Maximum duplicated frame redundancy offered, in milliseconds
    pub max_redundancy_millis: i32,
}

impl AmrParams {
    /// 4.75 kbps mode
    pub const AMR_MODE_0: i32 = 1 << 0;
    /// 5.15 kbps mode
    pub const AMR_MODE_1: i32 = 1 << 1;
    /// 5.90 kbps mode
    pub const AMR_MODE_2: i32 = 1 << 2;
    /// 6.70 kbps mode
    pub const AMR_MODE_3: i32 = 1 << 3;
    /// 7.40 kbps mode
    pub const AMR_MODE_4: i32 = 1 << 4;
    /// 7.95 kbps mode
    pub const AMR_MODE_5: i32 = 1 << 5;
    /// 10.2 kbps mode
    pub const AMR_MODE_6: i32 = 1 << 6;
    /// 12.2 kbps mode
    pub const AMR_MODE_7: i32 = 1 << 7;
    /// SID frame mode
    pub const AMR_MODE_8: i32 = 1 << 8;
}

/// EVS (enhanced voice services) codec parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvsParams {
    /// Negotiated EVS bandwidth (`EVS_BAND_*`)
    pub evs_bandwidth: i32,
    /// Bitmask of negotiated EVS modes
    pub evs_mode: i32,
    /// Channel-aware mode offset; zero disables channel-aware coding
    pub channel_aware_mode: u8,
    /// Restrict payloads to header-full format only
    pub use_header_full_only: bool,
    /// Codec mode request sent to the remote end
    pub codec_mode_request: u8,
}

impl EvsParams {
    pub const EVS_BAND_NONE: i32 = 0;
    /// Narrowband (8 kHz)
    pub const EVS_NARROW_BAND: i32 = 1 << 0;
    /// Wideband (16 kHz)
    pub const EVS_WIDE_BAND: i32 = 1 << 1;
    /// Super-wideband (32 kHz)
    pub const EVS_SUPER_WIDE_BAND: i32 = 1 << 2;
    /// Fullband (48 kHz)
    pub const EVS_FULL_BAND: i32 = 1 << 3;
}

/// Configuration of one audio RTP session.
///
/// Immutable from the dispatch layer's point of view: sessions transcode
/// it to the native wire form or the HAL structured form but never write
/// back into it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Direction of the media flow
    pub media_direction: MediaDirection,
    /// Radio access network carrying the flow
    pub access_network: AccessNetwork,
    /// Remote RTP endpoint
    pub remote_rtp_address: Option<SocketAddr>,
    /// RTCP settings; `None` leaves RTCP unconfigured
    pub rtcp_config: Option<RtcpConfig>,
    /// DSCP value stamped on outgoing packets
    pub dscp: u8,
    /// Recommended packetization interval in milliseconds
    pub ptime_millis: u8,
    /// Maximum packetization interval in milliseconds
    pub max_ptime_millis: u8,
    /// Negotiated audio codec (`CODEC_*`)
    pub codec_type: i32,
    /// Payload type number for incoming audio packets
    pub rx_payload_type_number: u8,
    /// Payload type number for outgoing audio packets
    pub tx_payload_type_number: u8,
    /// Sampling rate in kHz
    pub sampling_rate_khz: u8,
    /// Discontinuous transmission enabled
    pub dtx_enabled: bool,
    /// Payload type number for outgoing DTMF packets
    pub tx_dtmf_payload_type_number: u8,
    /// Payload type number for incoming DTMF packets
    pub rx_dtmf_payload_type_number: u8,
    /// DTMF sampling rate in kHz
    pub dtmf_sampling_rate_khz: u8,
    /// AMR parameters; set when `codec_type` is AMR or AMR-WB
    pub amr_params: Option<AmrParams>,
    /// EVS parameters; set when `codec_type` is EVS
    pub evs_params: Option<EvsParams>,
}

impl AudioConfig {
    /// Adaptive multi-rate narrowband
    pub const CODEC_AMR: i32 = 1 << 0;
    /// Adaptive multi-rate wideband
    pub const CODEC_AMR_WB: i32 = 1 << 1;
    /// Enhanced voice services
    pub const CODEC_EVS: i32 = 1 << 2;
    /// G.711 A-law
    pub const CODEC_PCMA: i32 = 1 << 3;
    /// G.711 mu-law
    pub const CODEC_PCMU: i32 = 1 << 4;

    pub fn with_remote_rtp_address(mut self, addr: SocketAddr) -> Self {
        self.remote_rtp_address = Some(addr);
        self
    }

    pub fn with_rtcp_config(mut self, rtcp: RtcpConfig) -> Self {
        self.rtcp_config = Some(rtcp);
        self
    }

    pub fn with_codec_type(mut self, codec: i32) -> Self {
        self.codec_type = codec;
        self
    }

    pub fn with_amr_params(mut self, amr: AmrParams) -> Self {
        self.amr_params = Some(amr);
        self
    }

    pub fn with_evs_params(mut self, evs: EvsParams) -> Self {
        self.evs_params = Some(evs);
        self
    }

    /// True when the configured codec carries an AMR parameter block.
    pub fn is_amr_codec(&self) -> bool {
        self.codec_type == Self::CODEC_AMR || self.codec_type == Self::CODEC_AMR_WB
    }

    /// True when the configured codec carries an EVS parameter block.
    pub fn is_evs_codec(&self) -> bool {
        self.codec_type == Self::CODEC_EVS
    }
}
