//! Video session configuration

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::rtcp::RtcpConfig;
use crate::types::{AccessNetwork, MediaDirection};

/// Configuration of one video RTP session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Direction of the media flow
    pub media_direction: MediaDirection,
    /// Radio access network carrying the flow
    pub access_network: AccessNetwork,
    /// Remote RTP endpoint
    pub remote_rtp_address: Option<SocketAddr>,
    /// RTCP settings
    pub rtcp_config: Option<RtcpConfig>,
    /// Camera/preview mode (`VIDEO_MODE_*`)
    pub video_mode: i32,
    /// Negotiated video codec (`VIDEO_CODEC_*`)
    pub codec_type: i32,
    /// Target frame rate in frames per second
    pub framerate: i32,
    /// Target bitrate in bits per second
    pub bitrate: i32,
    /// Codec profile (`AVC_PROFILE_*` / `HEVC_PROFILE_*`)
    pub codec_profile: i32,
    /// Codec level
    pub codec_level: i32,
    /// Interval between IDR frames in seconds
    pub intra_frame_interval_sec: i32,
    /// RTP payload packetization mode (`MODE_*`)
    pub packetization_mode: i32,
    /// Camera device id used for capture
    pub camera_id: i32,
    /// Camera zoom level
    pub camera_zoom: i32,
    /// Encoded frame width in pixels
    pub resolution_width: i32,
    /// Encoded frame height in pixels
    pub resolution_height: i32,
    /// Image shown while the video stream is paused
    pub pause_image_path: Option<String>,
    /// Device orientation in degrees at capture time
    pub device_orientation_degree: i32,
    /// CVO (coordination of video orientation) extension id; -1 disables it
    pub cvo_value: i32,
    /// Maximum RTP packet size in bytes
    pub max_mtu_bytes: i32,
    /// Bitmask of negotiated RTCP feedback messages (`RTPFB_*` / `PSFB_*`)
    pub rtcp_fb_types: i32,
}

impl VideoConfig {
    /// Camera preview only, no encoding
    pub const VIDEO_MODE_PREVIEW: i32 = 0;
    /// Camera capture encoded and transmitted
    pub const VIDEO_MODE_RECORDING: i32 = 1;
    /// Transmit the pause image instead of camera frames
    pub const VIDEO_MODE_PAUSE_IMAGE: i32 = 2;

    /// H.264 (AVC)
    pub const VIDEO_CODEC_AVC: i32 = 1 << 5;
    /// H.265 (HEVC)
    pub const VIDEO_CODEC_HEVC: i32 = 1 << 6;

    pub const CODEC_PROFILE_NONE: i32 = 0;
    pub const AVC_PROFILE_BASELINE: i32 = 1;
    pub const AVC_PROFILE_CONSTRAINED_BASELINE: i32 = 0x0001_0000;
    pub const AVC_PROFILE_MAIN: i32 = 0x0000_0002;
    pub const AVC_PROFILE_HIGH: i32 = 0x0000_0008;
    pub const AVC_PROFILE_CONSTRAINED_HIGH: i32 = 0x0008_0000;
    pub const HEVC_PROFILE_MAIN: i32 = 0x0000_0001;
    pub const HEVC_PROFILE_MAIN10: i32 = 0x0000_0002;

    pub const CODEC_LEVEL_NONE: i32 = 0;

    /// Single NAL unit per packet
    pub const MODE_SINGLE_NAL_UNIT: i32 = 0;
    /// Non-interleaved packetization
    pub const MODE_NON_INTERLEAVED: i32 = 1;
    /// Interleaved packetization
    pub const MODE_INTERLEAVED: i32 = 2;

    pub const RTP_FB_NONE: i32 = 0;
    /// Generic NACK (RFC 4585)
    pub const RTPFB_NACK: i32 = 1 << 0;
    /// Temporary maximum media stream bit rate request (RFC 5104)
    pub const RTPFB_TMMBR: i32 = 1 << 1;
    /// Temporary maximum media stream bit rate notification (RFC 5104)
    pub const RTPFB_TMMBN: i32 = 1 << 2;
    /// Picture loss indication (RFC 4585)
    pub const PSFB_PLI: i32 = 1 << 3;
    /// Full intra request (RFC 5104)
    pub const PSFB_FIR: i32 = 1 << 4;

    pub fn with_remote_rtp_address(mut self, addr: SocketAddr) -> Self {
        self.remote_rtp_address = Some(addr);
        self
    }

    pub fn with_rtcp_config(mut self, rtcp: RtcpConfig) -> Self {
        self.rtcp_config = Some(rtcp);
        self
    }

    pub fn with_resolution(mut self, width: i32, height: i32) -> Self {
        self.resolution_width = width;
        self.resolution_height = height;
        self
    }
}
