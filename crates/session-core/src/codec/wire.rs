//! Flat binary wire encoding
//!
//! The field layout here is the contract with the native engine: a
//! leading 4-byte message tag (owned by the session modules) followed by
//! the flattened payload in the exact order these functions define.
//! Every encoder has a matching decoder and the pair round-trips each
//! field unchanged.

use std::net::{IpAddr, SocketAddr};

use imsmedia_config::{
    AccessNetwork, AmrParams, AudioConfig, CallQuality, EvsParams, MediaDirection,
    MediaQualityStatus, MediaQualityThreshold, RtcpConfig, RtpHeaderExtension, TextConfig,
    VideoConfig,
};

use crate::codec::{WireReader, WireWriter};
use crate::error::CodecError;

fn put_direction(w: &mut WireWriter, direction: MediaDirection) {
    w.put_i32(direction.as_i32());
}

fn get_direction(r: &mut WireReader) -> Result<MediaDirection, CodecError> {
    let raw = r.get_i32()?;
    MediaDirection::from_i32(raw).ok_or(CodecError::InvalidValue {
        field: "media_direction",
        value: raw as i64,
    })
}

fn put_access_network(w: &mut WireWriter, network: AccessNetwork) {
    w.put_i32(network.as_i32());
}

fn get_access_network(r: &mut WireReader) -> Result<AccessNetwork, CodecError> {
    let raw = r.get_i32()?;
    AccessNetwork::from_i32(raw).ok_or(CodecError::InvalidValue {
        field: "access_network",
        value: raw as i64,
    })
}

fn put_socket_addr(w: &mut WireWriter, addr: Option<&SocketAddr>) {
    match addr {
        Some(addr) => {
            w.put_present(true);
            w.put_string(&addr.ip().to_string());
            w.put_u16(addr.port());
        }
        None => w.put_present(false),
    }
}

fn get_socket_addr(r: &mut WireReader) -> Result<Option<SocketAddr>, CodecError> {
    if !r.get_present()? {
        return Ok(None);
    }
    let host = r.get_string("remote_address")?;
    let port = r.get_u16()?;
    let ip: IpAddr = host
        .parse()
        .map_err(|_| CodecError::MalformedAddress(host))?;
    Ok(Some(SocketAddr::new(ip, port)))
}

fn put_rtcp_config(w: &mut WireWriter, rtcp: Option<&RtcpConfig>) {
    match rtcp {
        Some(rtcp) => {
            w.put_present(true);
            w.put_string(&rtcp.canonical_name);
            w.put_u16(rtcp.transmit_port);
            w.put_i32(rtcp.interval_sec);
            w.put_i32(rtcp.rtcp_xr_block_types);
        }
        None => w.put_present(false),
    }
}

fn get_rtcp_config(r: &mut WireReader) -> Result<Option<RtcpConfig>, CodecError> {
    if !r.get_present()? {
        return Ok(None);
    }
    Ok(Some(RtcpConfig {
        canonical_name: r.get_string("canonical_name")?,
        transmit_port: r.get_u16()?,
        interval_sec: r.get_i32()?,
        rtcp_xr_block_types: r.get_i32()?,
    }))
}

/// Flatten an [`AudioConfig`] onto the wire.
pub fn encode_audio_config(w: &mut WireWriter, config: &AudioConfig) {
    put_direction(w, config.media_direction);
    put_access_network(w, config.access_network);
    put_socket_addr(w, config.remote_rtp_address.as_ref());
    put_rtcp_config(w, config.rtcp_config.as_ref());
    w.put_u8(config.dscp);
    w.put_u8(config.ptime_millis);
    w.put_u8(config.max_ptime_millis);
    w.put_i32(config.codec_type);
    w.put_u8(config.rx_payload_type_number);
    w.put_u8(config.tx_payload_type_number);
    w.put_u8(config.sampling_rate_khz);
    w.put_bool(config.dtx_enabled);
    w.put_u8(config.tx_dtmf_payload_type_number);
    w.put_u8(config.rx_dtmf_payload_type_number);
    w.put_u8(config.dtmf_sampling_rate_khz);
    match &config.amr_params {
        Some(amr) => {
            w.put_present(true);
            w.put_i32(amr.amr_mode);
            w.put_bool(amr.octet_aligned);
            w.put_i32(amr.max_redundancy_millis);
        }
        None => w.put_present(false),
    }
    match &config.evs_params {
        Some(evs) => {
            w.put_present(true);
            w.put_i32(evs.evs_bandwidth);
            w.put_i32(evs.evs_mode);
            w.put_u8(evs.channel_aware_mode);
            w.put_bool(evs.use_header_full_only);
            w.put_u8(evs.codec_mode_request);
        }
        None => w.put_present(false),
    }
}

/// Rebuild an [`AudioConfig`] from the wire.
pub fn decode_audio_config(r: &mut WireReader) -> Result<AudioConfig, CodecError> {
    let media_direction = get_direction(r)?;
    let access_network = get_access_network(r)?;
    let remote_rtp_address = get_socket_addr(r)?;
    let rtcp_config = get_rtcp_config(r)?;
    let dscp = r.get_u8()?;
    let ptime_millis = r.get_u8()?;
    let max_ptime_millis = r.get_u8()?;
    let codec_type = r.get_i32()?;
    let rx_payload_type_number = r.get_u8()?;
    let tx_payload_type_number = r.get_u8()?;
    let sampling_rate_khz = r.get_u8()?;
    let dtx_enabled = r.get_bool()?;
    let tx_dtmf_payload_type_number = r.get_u8()?;
    let rx_dtmf_payload_type_number = r.get_u8()?;
    let dtmf_sampling_rate_khz = r.get_u8()?;
    let amr_params = if r.get_present()? {
        Some(AmrParams {
            amr_mode: r.get_i32()?,
            octet_aligned: r.get_bool()?,
            max_redundancy_millis: r.get_i32()?,
        })
    } else {
        None
    };
    let evs_params = if r.get_present()? {
        Some(EvsParams {
            evs_bandwidth: r.get_i32()?,
            evs_mode: r.get_i32()?,
            channel_aware_mode: r.get_u8()?,
            use_header_full_only: r.get_bool()?,
            codec_mode_request: r.get_u8()?,
        })
    } else {
        None
    };
    Ok(AudioConfig {
        media_direction,
        access_network,
        remote_rtp_address,
        rtcp_config,
        dscp,
        ptime_millis,
        max_ptime_millis,
        codec_type,
        rx_payload_type_number,
        tx_payload_type_number,
        sampling_rate_khz,
        dtx_enabled,
        tx_dtmf_payload_type_number,
        rx_dtmf_payload_type_number,
        dtmf_sampling_rate_khz,
        amr_params,
        evs_params,
    })
}

/// Flatten a [`VideoConfig`] onto the wire.
pub fn encode_video_config(w: &mut WireWriter, config: &VideoConfig) {
    put_direction(w, config.media_direction);
    put_access_network(w, config.access_network);
    put_socket_addr(w, config.remote_rtp_address.as_ref());
    put_rtcp_config(w, config.rtcp_config.as_ref());
    w.put_i32(config.video_mode);
    w.put_i32(config.codec_type);
    w.put_i32(config.framerate);
    w.put_i32(config.bitrate);
    w.put_i32(config.codec_profile);
    w.put_i32(config.codec_level);
    w.put_i32(config.intra_frame_interval_sec);
    w.put_i32(config.packetization_mode);
    w.put_i32(config.camera_id);
    w.put_i32(config.camera_zoom);
    w.put_i32(config.resolution_width);
    w.put_i32(config.resolution_height);
    match &config.pause_image_path {
        Some(path) => {
            w.put_present(true);
            w.put_string(path);
        }
        None => w.put_present(false),
    }
    w.put_i32(config.device_orientation_degree);
    w.put_i32(config.cvo_value);
    w.put_i32(config.max_mtu_bytes);
    w.put_i32(config.rtcp_fb_types);
}

/// Rebuild a [`VideoConfig`] from the wire.
pub fn decode_video_config(r: &mut WireReader) -> Result<VideoConfig, CodecError> {
    let media_direction = get_direction(r)?;
    let access_network = get_access_network(r)?;
    let remote_rtp_address = get_socket_addr(r)?;
    let rtcp_config = get_rtcp_config(r)?;
    let video_mode = r.get_i32()?;
    let codec_type = r.get_i32()?;
    let framerate = r.get_i32()?;
    let bitrate = r.get_i32()?;
    let codec_profile = r.get_i32()?;
    let codec_level = r.get_i32()?;
    let intra_frame_interval_sec = r.get_i32()?;
    let packetization_mode = r.get_i32()?;
    let camera_id = r.get_i32()?;
    let camera_zoom = r.get_i32()?;
    let resolution_width = r.get_i32()?;
    let resolution_height = r.get_i32()?;
    let pause_image_path = if r.get_present()? {
        Some(r.get_string("pause_image_path")?)
    } else {
        None
    };
    Ok(VideoConfig {
        media_direction,
        access_network,
        remote_rtp_address,
        rtcp_config,
        video_mode,
        codec_type,
        framerate,
        bitrate,
        codec_profile,
        codec_level,
        intra_frame_interval_sec,
        packetization_mode,
        camera_id,
        camera_zoom,
        resolution_width,
        resolution_height,
        pause_image_path,
        device_orientation_degree: r.get_i32()?,
        cvo_value: r.get_i32()?,
        max_mtu_bytes: r.get_i32()?,
        rtcp_fb_types: r.get_i32()?,
    })
}

/// Flatten a [`TextConfig`] onto the wire.
pub fn encode_text_config(w: &mut WireWriter, config: &TextConfig) {
    put_direction(w, config.media_direction);
    put_access_network(w, config.access_network);
    put_socket_addr(w, config.remote_rtp_address.as_ref());
    put_rtcp_config(w, config.rtcp_config.as_ref());
    w.put_i32(config.codec_type);
    w.put_i32(config.bitrate);
    w.put_u8(config.redundant_payload);
    w.put_u8(config.redundant_level);
    w.put_bool(config.keep_redundant_level);
}

/// Rebuild a [`TextConfig`] from the wire.
pub fn decode_text_config(r: &mut WireReader) -> Result<TextConfig, CodecError> {
    Ok(TextConfig {
        media_direction: get_direction(r)?,
        access_network: get_access_network(r)?,
        remote_rtp_address: get_socket_addr(r)?,
        rtcp_config: get_rtcp_config(r)?,
        codec_type: r.get_i32()?,
        bitrate: r.get_i32()?,
        redundant_payload: r.get_u8()?,
        redundant_level: r.get_u8()?,
        keep_redundant_level: r.get_bool()?,
    })
}

/// Flatten a [`MediaQualityThreshold`] onto the wire.
pub fn encode_media_quality_threshold(w: &mut WireWriter, threshold: &MediaQualityThreshold) {
    w.put_i32_list(&threshold.rtp_inactivity_timer_millis);
    w.put_i32(threshold.rtcp_inactivity_timer_millis);
    w.put_i32(threshold.rtp_hysteresis_time_millis);
    w.put_i32(threshold.rtp_packet_loss_duration_millis);
    w.put_i32_list(&threshold.rtp_packet_loss_rate);
    w.put_i32_list(&threshold.rtp_jitter_millis);
    w.put_bool(threshold.notify_current_status);
    w.put_i32(threshold.video_bitrate_bps);
}

/// Rebuild a [`MediaQualityThreshold`] from the wire.
pub fn decode_media_quality_threshold(
    r: &mut WireReader,
) -> Result<MediaQualityThreshold, CodecError> {
    Ok(MediaQualityThreshold {
        rtp_inactivity_timer_millis: r.get_i32_list()?,
        rtcp_inactivity_timer_millis: r.get_i32()?,
        rtp_hysteresis_time_millis: r.get_i32()?,
        rtp_packet_loss_duration_millis: r.get_i32()?,
        rtp_packet_loss_rate: r.get_i32_list()?,
        rtp_jitter_millis: r.get_i32_list()?,
        notify_current_status: r.get_bool()?,
        video_bitrate_bps: r.get_i32()?,
    })
}

/// Flatten a [`MediaQualityStatus`] onto the wire.
pub fn encode_media_quality_status(w: &mut WireWriter, status: &MediaQualityStatus) {
    w.put_i32(status.rtp_inactivity_time_millis);
    w.put_i32(status.rtcp_inactivity_time_millis);
    w.put_i32(status.rtp_packet_loss_rate);
    w.put_i32(status.rtp_jitter_millis);
}

/// Rebuild a [`MediaQualityStatus`] from the wire.
pub fn decode_media_quality_status(r: &mut WireReader) -> Result<MediaQualityStatus, CodecError> {
    Ok(MediaQualityStatus {
        rtp_inactivity_time_millis: r.get_i32()?,
        rtcp_inactivity_time_millis: r.get_i32()?,
        rtp_packet_loss_rate: r.get_i32()?,
        rtp_jitter_millis: r.get_i32()?,
    })
}

/// Flatten a [`CallQuality`] report onto the wire.
pub fn encode_call_quality(w: &mut WireWriter, quality: &CallQuality) {
    w.put_i32(quality.downlink_call_quality_level);
    w.put_i32(quality.uplink_call_quality_level);
    w.put_i32(quality.call_duration);
    w.put_i32(quality.num_rtp_packets_transmitted);
    w.put_i32(quality.num_rtp_packets_received);
    w.put_i32(quality.num_rtp_packets_transmitted_lost);
    w.put_i32(quality.num_rtp_packets_not_received);
    w.put_i32(quality.average_relative_jitter);
    w.put_i32(quality.max_relative_jitter);
    w.put_i32(quality.average_round_trip_time);
    w.put_i32(quality.codec_type);
    w.put_bool(quality.rtp_inactivity_detected);
    w.put_bool(quality.rx_silence_detected);
    w.put_bool(quality.tx_silence_detected);
    w.put_i32(quality.num_voice_frames);
    w.put_i32(quality.num_no_data_frames);
    w.put_i32(quality.num_dropped_rtp_packets);
    w.put_i32(quality.min_playout_delay_millis);
    w.put_i32(quality.max_playout_delay_millis);
    w.put_i32(quality.num_rtp_sid_packets_received);
    w.put_i32(quality.num_rtp_duplicate_packets);
}

/// Rebuild a [`CallQuality`] report from the wire.
pub fn decode_call_quality(r: &mut WireReader) -> Result<CallQuality, CodecError> {
    Ok(CallQuality {
        downlink_call_quality_level: r.get_i32()?,
        uplink_call_quality_level: r.get_i32()?,
        call_duration: r.get_i32()?,
        num_rtp_packets_transmitted: r.get_i32()?,
        num_rtp_packets_received: r.get_i32()?,
        num_rtp_packets_transmitted_lost: r.get_i32()?,
        num_rtp_packets_not_received: r.get_i32()?,
        average_relative_jitter: r.get_i32()?,
        max_relative_jitter: r.get_i32()?,
        average_round_trip_time: r.get_i32()?,
        codec_type: r.get_i32()?,
        rtp_inactivity_detected: r.get_bool()?,
        rx_silence_detected: r.get_bool()?,
        tx_silence_detected: r.get_bool()?,
        num_voice_frames: r.get_i32()?,
        num_no_data_frames: r.get_i32()?,
        num_dropped_rtp_packets: r.get_i32()?,
        min_playout_delay_millis: r.get_i32()?,
        max_playout_delay_millis: r.get_i32()?,
        num_rtp_sid_packets_received: r.get_i32()?,
        num_rtp_duplicate_packets: r.get_i32()?,
    })
}

/// Flatten a list of RTP header extensions onto the wire.
pub fn encode_header_extensions(w: &mut WireWriter, extensions: &[RtpHeaderExtension]) {
    w.put_u16(extensions.len() as u16);
    for extension in extensions {
        w.put_u8(extension.local_identifier);
        w.put_bytes(&extension.extension_data);
    }
}

/// Rebuild a list of RTP header extensions from the wire.
pub fn decode_header_extensions(r: &mut WireReader) -> Result<Vec<RtpHeaderExtension>, CodecError> {
    let count = r.get_u16()? as usize;
    let mut extensions = Vec::with_capacity(count);
    for _ in 0..count {
        let local_identifier = r.get_u8()?;
        let extension_data = r.get_bytes()?;
        extensions.push(RtpHeaderExtension {
            local_identifier,
            extension_data,
        });
    }
    Ok(extensions)
}

/// Encode an optional config payload: presence flag then the body.
pub fn encode_opt_audio_config(w: &mut WireWriter, config: Option<&AudioConfig>) {
    match config {
        Some(config) => {
            w.put_present(true);
            encode_audio_config(w, config);
        }
        None => w.put_present(false),
    }
}

/// Decode an optional config payload.
pub fn decode_opt_audio_config(r: &mut WireReader) -> Result<Option<AudioConfig>, CodecError> {
    if r.get_present()? {
        Ok(Some(decode_audio_config(r)?))
    } else {
        Ok(None)
    }
}

pub fn encode_opt_video_config(w: &mut WireWriter, config: Option<&VideoConfig>) {
    match config {
        Some(config) => {
            w.put_present(true);
            encode_video_config(w, config);
        }
        None => w.put_present(false),
    }
}

pub fn decode_opt_video_config(r: &mut WireReader) -> Result<Option<VideoConfig>, CodecError> {
    if r.get_present()? {
        Ok(Some(decode_video_config(r)?))
    } else {
        Ok(None)
    }
}

pub fn encode_opt_text_config(w: &mut WireWriter, config: Option<&TextConfig>) {
    match config {
        Some(config) => {
            w.put_present(true);
            encode_text_config(w, config);
        }
        None => w.put_present(false),
    }
}

pub fn decode_opt_text_config(r: &mut WireReader) -> Result<Option<TextConfig>, CodecError> {
    if r.get_present()? {
        Ok(Some(decode_text_config(r)?))
    } else {
        Ok(None)
    }
}
