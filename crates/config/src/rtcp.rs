//! RTCP configuration

use serde::{Deserialize, Serialize};

/// RTCP settings attached to a media flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RtcpConfig {
    /// Canonical name (CNAME) advertised in RTCP SDES packets
    pub canonical_name: String,
    /// Port on which outgoing RTCP packets are transmitted
    pub transmit_port: u16,
    /// RTCP transmit interval in seconds; zero disables RTCP transmission
    pub interval_sec: i32,
    /// Bitmask of RTCP-XR report block types to include (RFC 3611)
    pub rtcp_xr_block_types: i32,
}

impl RtcpConfig {
    /// Disable RTCP-XR reporting entirely.
    pub const FLAG_RTCPXR_NONE: i32 = 0;
    /// Loss RLE report block
    pub const FLAG_RTCPXR_LOSS_RLE_REPORT_BLOCK: i32 = 1 << 0;
    /// Duplicate RLE report block
    pub const FLAG_RTCPXR_DUPLICATE_RLE_REPORT_BLOCK: i32 = 1 << 1;
    /// Packet receipt times report block
    pub const FLAG_RTCPXR_PACKET_RECEIPT_TIMES_REPORT_BLOCK: i32 = 1 << 2;
    /// Receiver reference time report block
    pub const FLAG_RTCPXR_RECEIVER_REFERENCE_TIME_REPORT_BLOCK: i32 = 1 << 3;
    /// DLRR report block
    pub const FLAG_RTCPXR_DLRR_REPORT_BLOCK: i32 = 1 << 4;
    /// Statistics summary report block
    pub const FLAG_RTCPXR_STATISTICS_SUMMARY_REPORT_BLOCK: i32 = 1 << 5;
    /// VoIP metrics report block
    pub const FLAG_RTCPXR_VOIP_METRICS_REPORT_BLOCK: i32 = 1 << 6;

    /// Create a config with the given CNAME and everything else defaulted.
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            ..Default::default()
        }
    }

    pub fn with_transmit_port(mut self, port: u16) -> Self {
        self.transmit_port = port;
        self
    }

    pub fn with_interval_sec(mut self, interval: i32) -> Self {
        self.interval_sec = interval;
        self
    }

    pub fn with_rtcp_xr_block_types(mut self, blocks: i32) -> Self {
        self.rtcp_xr_block_types = blocks;
        self
    }
}
