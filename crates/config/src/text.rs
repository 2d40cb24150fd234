//! Real-time text session configuration

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::rtcp::RtcpConfig;
use crate::types::{AccessNetwork, MediaDirection};

/// Configuration of one real-time text (RTT) session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextConfig {
    /// Direction of the media flow
    pub media_direction: MediaDirection,
    /// Radio access network carrying the flow
    pub access_network: AccessNetwork,
    /// Remote RTP endpoint
    pub remote_rtp_address: Option<SocketAddr>,
    /// RTCP settings
    pub rtcp_config: Option<RtcpConfig>,
    /// Negotiated text codec (`TEXT_*`)
    pub codec_type: i32,
    /// Target bitrate in bits per second
    pub bitrate: i32,
    /// Payload type number of the redundant (RED) stream
    pub redundant_payload: u8,
    /// Number of redundant generations carried per packet
    pub redundant_level: u8,
    /// Keep sending redundancy even when the channel is idle
    pub keep_redundant_level: bool,
}

impl TextConfig {
    /// T.140 text codec (RFC 4103)
    pub const TEXT_T140: i32 = 1 << 0;
    /// Redundancy encoding on top of T.140 (RFC 2198)
    pub const TEXT_T140_RED: i32 = 1 << 1;

    pub fn with_remote_rtp_address(mut self, addr: SocketAddr) -> Self {
        self.remote_rtp_address = Some(addr);
        self
    }

    pub fn with_rtcp_config(mut self, rtcp: RtcpConfig) -> Self {
        self.rtcp_config = Some(rtcp);
        self
    }
}
