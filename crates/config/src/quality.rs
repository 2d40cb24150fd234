//! Media quality thresholds, status reports and call quality metrics

use serde::{Deserialize, Serialize};

/// Thresholds the media stack monitors and reports against.
///
/// List-valued fields carry one entry per threshold step; crossing any
/// step in either direction produces a [`MediaQualityStatus`] report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaQualityThreshold {
    /// RTP inactivity timers in milliseconds
    pub rtp_inactivity_timer_millis: Vec<i32>,
    /// RTCP inactivity timer in milliseconds
    pub rtcp_inactivity_timer_millis: i32,
    /// Hysteresis time applied to repeated notifications, in milliseconds
    pub rtp_hysteresis_time_millis: i32,
    /// Duration over which packet loss rate is measured, in milliseconds
    pub rtp_packet_loss_duration_millis: i32,
    /// Packet loss rate thresholds in percent
    pub rtp_packet_loss_rate: Vec<i32>,
    /// Jitter thresholds in milliseconds
    pub rtp_jitter_millis: Vec<i32>,
    /// Report the current status immediately after the threshold is set
    pub notify_current_status: bool,
    /// Video bitrate threshold in bits per second
    pub video_bitrate_bps: i32,
}

/// Snapshot of measured media quality, reported when a threshold is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaQualityStatus {
    pub rtp_inactivity_time_millis: i32,
    pub rtcp_inactivity_time_millis: i32,
    pub rtp_packet_loss_rate: i32,
    pub rtp_jitter_millis: i32,
}

/// Aggregate call quality metrics reported by the audio engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallQuality {
    /// Downlink quality level (0 = excellent .. 4 = bad, 5 = not available)
    pub downlink_call_quality_level: i32,
    /// Uplink quality level
    pub uplink_call_quality_level: i32,
    /// Call duration in milliseconds
    pub call_duration: i32,
    pub num_rtp_packets_transmitted: i32,
    pub num_rtp_packets_received: i32,
    pub num_rtp_packets_transmitted_lost: i32,
    pub num_rtp_packets_not_received: i32,
    /// Average relative jitter in milliseconds
    pub average_relative_jitter: i32,
    /// Maximum relative jitter in milliseconds
    pub max_relative_jitter: i32,
    /// Average round trip time in milliseconds
    pub average_round_trip_time: i32,
    /// Codec in use, as an `AudioConfig::CODEC_*` tag
    pub codec_type: i32,
    /// True when no incoming RTP was seen for the inactivity window
    pub rtp_inactivity_detected: bool,
    /// Silence detected on the incoming stream at call setup
    pub rx_silence_detected: bool,
    /// Silence detected on the outgoing stream at call setup
    pub tx_silence_detected: bool,
    pub num_voice_frames: i32,
    pub num_no_data_frames: i32,
    pub num_dropped_rtp_packets: i32,
    /// Minimum playout delay in milliseconds
    pub min_playout_delay_millis: i32,
    /// Maximum playout delay in milliseconds
    pub max_playout_delay_millis: i32,
    pub num_rtp_sid_packets_received: i32,
    pub num_rtp_duplicate_packets: i32,
}
