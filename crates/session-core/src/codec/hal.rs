//! Conversions between the public config types and the HAL structured
//! argument types
//!
//! The offload path does not speak the flat binary wire form; it takes
//! structured values over RPC. These functions are total and
//! null-tolerant: `None` in yields `None` out, and sub-blocks missing on
//! the HAL side simply leave the matching fields at their defaults.

use std::net::SocketAddr;

use imsmedia_config::{
    AudioConfig, CallQuality, MediaDirection, MediaQualityStatus, MediaQualityThreshold,
    RtcpConfig, RtpHeaderExtension,
};
use imsmedia_config::{AccessNetwork, AmrParams, EvsParams};

use crate::hal;

fn build_rtp_address(config: &AudioConfig) -> Option<hal::RtpAddress> {
    config.remote_rtp_address.map(|addr| hal::RtpAddress {
        ip_address: addr.ip().to_string(),
        port_number: addr.port(),
    })
}

fn build_dtmf_params(config: &AudioConfig) -> hal::DtmfParams {
    hal::DtmfParams {
        tx_payload_type_number: config.tx_dtmf_payload_type_number,
        rx_payload_type_number: config.rx_dtmf_payload_type_number,
        sampling_rate_khz: config.dtmf_sampling_rate_khz,
    }
}

fn build_codec_params(config: &AudioConfig) -> hal::CodecParams {
    let codec_specific_params = if config.is_amr_codec() {
        config.amr_params.as_ref().map(|amr| {
            hal::CodecSpecificParams::Amr(hal::AmrParams {
                amr_mode: amr.amr_mode,
                octet_aligned: amr.octet_aligned,
                max_redundancy_millis: amr.max_redundancy_millis,
            })
        })
    } else if config.is_evs_codec() {
        config.evs_params.as_ref().map(|evs| {
            hal::CodecSpecificParams::Evs(hal::EvsParams {
                bandwidth: evs.evs_bandwidth,
                evs_mode: evs.evs_mode,
                channel_aware_mode: evs.channel_aware_mode,
                use_header_full_only: evs.use_header_full_only,
                codec_mode_request: evs.codec_mode_request,
            })
        })
    } else {
        None
    };

    hal::CodecParams {
        codec_type: config.codec_type,
        rx_payload_type_number: config.rx_payload_type_number,
        tx_payload_type_number: config.tx_payload_type_number,
        sampling_rate_khz: config.sampling_rate_khz,
        dtx_enabled: config.dtx_enabled,
        codec_specific_params,
    }
}

fn build_session_params(config: &AudioConfig) -> hal::RtpSessionParams {
    hal::RtpSessionParams {
        ptime_millis: config.ptime_millis,
        max_ptime_millis: config.max_ptime_millis,
        dscp: config.dscp,
        dtmf_params: Some(build_dtmf_params(config)),
        codec_params: Some(build_codec_params(config)),
    }
}

fn build_rtcp_config(config: &AudioConfig) -> Option<hal::RtcpConfig> {
    config.rtcp_config.as_ref().map(|rtcp| hal::RtcpConfig {
        canonical_name: rtcp.canonical_name.clone(),
        transmit_port: rtcp.transmit_port,
        transmit_interval_sec: rtcp.interval_sec,
        rtcp_xr_blocks: rtcp.rtcp_xr_block_types,
    })
}

/// Convert an [`AudioConfig`] into the HAL session configuration.
pub fn audio_config_to_hal(config: Option<&AudioConfig>) -> Option<hal::RtpConfig> {
    config.map(|config| hal::RtpConfig {
        direction: config.media_direction.as_i32(),
        access_network: config.access_network.as_i32(),
        remote_address: build_rtp_address(config),
        session_params: Some(build_session_params(config)),
        rtcp_config: build_rtcp_config(config),
    })
}

fn parse_remote_address(address: &hal::RtpAddress) -> Option<SocketAddr> {
    address
        .ip_address
        .parse()
        .ok()
        .map(|ip| SocketAddr::new(ip, address.port_number))
}

/// Convert a HAL session configuration back into an [`AudioConfig`].
pub fn hal_to_audio_config(config: Option<&hal::RtpConfig>) -> Option<AudioConfig> {
    let config = config?;
    let mut audio = AudioConfig {
        media_direction: MediaDirection::from_i32(config.direction).unwrap_or_default(),
        access_network: AccessNetwork::from_i32(config.access_network).unwrap_or_default(),
        remote_rtp_address: config.remote_address.as_ref().and_then(parse_remote_address),
        rtcp_config: config.rtcp_config.as_ref().map(|rtcp| RtcpConfig {
            canonical_name: rtcp.canonical_name.clone(),
            transmit_port: rtcp.transmit_port,
            interval_sec: rtcp.transmit_interval_sec,
            rtcp_xr_block_types: rtcp.rtcp_xr_blocks,
        }),
        ..AudioConfig::default()
    };

    if let Some(session_params) = &config.session_params {
        audio.dscp = session_params.dscp;
        audio.ptime_millis = session_params.ptime_millis;
        audio.max_ptime_millis = session_params.max_ptime_millis;

        if let Some(dtmf) = &session_params.dtmf_params {
            audio.tx_dtmf_payload_type_number = dtmf.tx_payload_type_number;
            audio.rx_dtmf_payload_type_number = dtmf.rx_payload_type_number;
            audio.dtmf_sampling_rate_khz = dtmf.sampling_rate_khz;
        }

        if let Some(codec) = &session_params.codec_params {
            audio.codec_type = codec.codec_type;
            audio.rx_payload_type_number = codec.rx_payload_type_number;
            audio.tx_payload_type_number = codec.tx_payload_type_number;
            audio.sampling_rate_khz = codec.sampling_rate_khz;
            audio.dtx_enabled = codec.dtx_enabled;

            match &codec.codec_specific_params {
                Some(hal::CodecSpecificParams::Amr(amr)) => {
                    audio.amr_params = Some(AmrParams {
                        amr_mode: amr.amr_mode,
                        octet_aligned: amr.octet_aligned,
                        max_redundancy_millis: amr.max_redundancy_millis,
                    });
                }
                Some(hal::CodecSpecificParams::Evs(evs)) => {
                    audio.evs_params = Some(EvsParams {
                        evs_bandwidth: evs.bandwidth,
                        evs_mode: evs.evs_mode,
                        channel_aware_mode: evs.channel_aware_mode,
                        use_header_full_only: evs.use_header_full_only,
                        codec_mode_request: evs.codec_mode_request,
                    });
                }
                None => {}
            }
        }
    }

    Some(audio)
}

/// Convert a [`MediaQualityThreshold`] into its HAL form.
///
/// The HAL carries no video bitrate threshold; that field does not
/// cross this boundary.
pub fn threshold_to_hal(
    threshold: Option<&MediaQualityThreshold>,
) -> Option<hal::MediaQualityThreshold> {
    threshold.map(|threshold| hal::MediaQualityThreshold {
        rtp_inactivity_timer_millis: threshold.rtp_inactivity_timer_millis.clone(),
        rtcp_inactivity_timer_millis: threshold.rtcp_inactivity_timer_millis,
        rtp_hysteresis_time_millis: threshold.rtp_hysteresis_time_millis,
        rtp_packet_loss_duration_millis: threshold.rtp_packet_loss_duration_millis,
        rtp_packet_loss_rate: threshold.rtp_packet_loss_rate.clone(),
        rtp_jitter_millis: threshold.rtp_jitter_millis.clone(),
        notify_current_status: threshold.notify_current_status,
    })
}

/// Convert a HAL threshold back; the video bitrate threshold comes back
/// as zero.
pub fn hal_to_threshold(
    threshold: Option<&hal::MediaQualityThreshold>,
) -> Option<MediaQualityThreshold> {
    threshold.map(|threshold| MediaQualityThreshold {
        rtp_inactivity_timer_millis: threshold.rtp_inactivity_timer_millis.clone(),
        rtcp_inactivity_timer_millis: threshold.rtcp_inactivity_timer_millis,
        rtp_hysteresis_time_millis: threshold.rtp_hysteresis_time_millis,
        rtp_packet_loss_duration_millis: threshold.rtp_packet_loss_duration_millis,
        rtp_packet_loss_rate: threshold.rtp_packet_loss_rate.clone(),
        rtp_jitter_millis: threshold.rtp_jitter_millis.clone(),
        notify_current_status: threshold.notify_current_status,
        video_bitrate_bps: 0,
    })
}

/// Convert a [`MediaQualityStatus`] into its HAL form.
pub fn status_to_hal(status: &MediaQualityStatus) -> hal::MediaQualityStatus {
    hal::MediaQualityStatus {
        rtp_inactivity_time_millis: status.rtp_inactivity_time_millis,
        rtcp_inactivity_time_millis: status.rtcp_inactivity_time_millis,
        rtp_packet_loss_rate: status.rtp_packet_loss_rate,
        rtp_jitter_millis: status.rtp_jitter_millis,
    }
}

/// Convert a HAL quality status into its public form.
pub fn hal_to_status(status: &hal::MediaQualityStatus) -> MediaQualityStatus {
    MediaQualityStatus {
        rtp_inactivity_time_millis: status.rtp_inactivity_time_millis,
        rtcp_inactivity_time_millis: status.rtcp_inactivity_time_millis,
        rtp_packet_loss_rate: status.rtp_packet_loss_rate,
        rtp_jitter_millis: status.rtp_jitter_millis,
    }
}

/// Convert an [`RtpHeaderExtension`] into its HAL form.
pub fn header_extension_to_hal(extension: &RtpHeaderExtension) -> hal::RtpHeaderExtension {
    hal::RtpHeaderExtension {
        local_id: extension.local_identifier,
        data: extension.extension_data.to_vec(),
    }
}

/// Convert a HAL header extension into its public form.
pub fn hal_to_header_extension(extension: &hal::RtpHeaderExtension) -> RtpHeaderExtension {
    RtpHeaderExtension::new(extension.local_id, extension.data.clone())
}

/// Convert a HAL call quality report into its public form.
pub fn hal_to_call_quality(quality: &hal::CallQuality) -> CallQuality {
    CallQuality {
        downlink_call_quality_level: quality.downlink_call_quality_level,
        uplink_call_quality_level: quality.uplink_call_quality_level,
        call_duration: quality.call_duration,
        num_rtp_packets_transmitted: quality.num_rtp_packets_transmitted,
        num_rtp_packets_received: quality.num_rtp_packets_received,
        num_rtp_packets_transmitted_lost: quality.num_rtp_packets_transmitted_lost,
        num_rtp_packets_not_received: quality.num_rtp_packets_not_received,
        average_relative_jitter: quality.average_relative_jitter,
        max_relative_jitter: quality.max_relative_jitter,
        average_round_trip_time: quality.average_round_trip_time,
        codec_type: quality.codec_type,
        rtp_inactivity_detected: quality.rtp_inactivity_detected,
        rx_silence_detected: quality.rx_silence_detected,
        tx_silence_detected: quality.tx_silence_detected,
        num_voice_frames: quality.num_voice_frames,
        num_no_data_frames: quality.num_no_data_frames,
        num_dropped_rtp_packets: quality.num_dropped_rtp_packets,
        min_playout_delay_millis: quality.min_playout_delay_millis,
        max_playout_delay_millis: quality.max_playout_delay_millis,
        num_rtp_sid_packets_received: quality.num_rtp_sid_packets_received,
        num_rtp_duplicate_packets: quality.num_rtp_duplicate_packets,
    }
}

/// Convert a public call quality report into its HAL form.
pub fn call_quality_to_hal(quality: &CallQuality) -> hal::CallQuality {
    hal::CallQuality {
        downlink_call_quality_level: quality.downlink_call_quality_level,
        uplink_call_quality_level: quality.uplink_call_quality_level,
        call_duration: quality.call_duration,
        num_rtp_packets_transmitted: quality.num_rtp_packets_transmitted,
        num_rtp_packets_received: quality.num_rtp_packets_received,
        num_rtp_packets_transmitted_lost: quality.num_rtp_packets_transmitted_lost,
        num_rtp_packets_not_received: quality.num_rtp_packets_not_received,
        average_relative_jitter: quality.average_relative_jitter,
        max_relative_jitter: quality.max_relative_jitter,
        average_round_trip_time: quality.average_round_trip_time,
        codec_type: quality.codec_type,
        rtp_inactivity_detected: quality.rtp_inactivity_detected,
        rx_silence_detected: quality.rx_silence_detected,
        tx_silence_detected: quality.tx_silence_detected,
        num_voice_frames: quality.num_voice_frames,
        num_no_data_frames: quality.num_no_data_frames,
        num_dropped_rtp_packets: quality.num_dropped_rtp_packets,
        min_playout_delay_millis: quality.min_playout_delay_millis,
        max_playout_delay_millis: quality.max_playout_delay_millis,
        num_rtp_sid_packets_received: quality.num_rtp_sid_packets_received,
        num_rtp_duplicate_packets: quality.num_rtp_duplicate_packets,
    }
}
