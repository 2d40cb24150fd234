//! Registry behavior: id allocation, open/close multiplexing across
//! media types, teardown, and the unrecognized-session-type gap.

mod common;

use imsmedia_config::{AudioConfig, RtpError, TextConfig, VideoConfig};
use imsmedia_session_core::codec::WireWriter;
use imsmedia_session_core::session::{audio, text, video};
use imsmedia_session_core::{
    ImsMediaController, OpenSessionRequest, SESSION_TYPE_AUDIO, SESSION_TYPE_RTT,
    SESSION_TYPE_VIDEO,
};

use common::*;

#[tokio::test]
async fn open_session_handshake_through_the_registry() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let callback = RecordingAudioCallback::new();

    controller.open_session(
        SESSION_TYPE_AUDIO,
        Some(test_socket()),
        Some(test_socket()),
        OpenSessionRequest::Audio {
            config: Some(AudioConfig::default()),
            callback: callback.clone(),
        },
    );

    assert!(controller.is_session_open(1));
    wait_for(|| bridge.message_tags(1) == vec![audio::CMD_OPEN_SESSION]).await;

    bridge.inject(
        1,
        WireWriter::tagged(audio::EVENT_OPEN_SESSION_SUCCESS).into_bytes(),
    );
    wait_for(|| callback.open_success_count() == 1).await;
    assert!(controller.is_session_open(1));
}

#[tokio::test]
async fn open_failure_removes_the_registry_entry() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let callback = RecordingAudioCallback::new();

    controller.open_session(
        SESSION_TYPE_AUDIO,
        None,
        None,
        OpenSessionRequest::Audio {
            config: None,
            callback: callback.clone(),
        },
    );
    wait_for(|| !bridge.message_tags(1).is_empty()).await;

    let mut writer = WireWriter::tagged(audio::EVENT_OPEN_SESSION_FAILURE);
    writer.put_i32(RtpError::NoResources.as_i32());
    bridge.inject(1, writer.into_bytes());

    wait_for(|| callback.event_count() == 1).await;
    assert!(matches!(
        callback.events.lock()[0],
        AudioCallbackEvent::OpenFailure(RtpError::NoResources)
    ));
    wait_for(|| !controller.is_session_open(1)).await;

    // Exactly once.
    settle().await;
    assert_eq!(callback.event_count(), 1);
}

#[tokio::test]
async fn unrecognized_session_type_yields_no_session_and_no_callback() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let callback = RecordingAudioCallback::new();

    controller.open_session(
        99,
        None,
        None,
        OpenSessionRequest::Audio {
            config: None,
            callback: callback.clone(),
        },
    );

    settle().await;
    assert_eq!(controller.session_count(), 0);
    assert_eq!(callback.event_count(), 0);
    assert!(bridge.calls.lock().is_empty());
}

#[tokio::test]
async fn mismatched_request_payload_is_dropped_like_an_unknown_type() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let callback = RecordingAudioCallback::new();

    controller.open_session(
        SESSION_TYPE_VIDEO,
        None,
        None,
        OpenSessionRequest::Audio {
            config: None,
            callback: callback.clone(),
        },
    );

    settle().await;
    assert_eq!(controller.session_count(), 0);
    assert_eq!(callback.event_count(), 0);
}

#[tokio::test]
async fn session_ids_increase_monotonically_across_media_types() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let audio_callback = RecordingAudioCallback::new();
    let video_callback = RecordingVideoCallback::new();
    let text_callback = RecordingTextCallback::new();

    controller.open_session(
        SESSION_TYPE_AUDIO,
        None,
        None,
        OpenSessionRequest::Audio {
            config: Some(AudioConfig::default()),
            callback: audio_callback.clone(),
        },
    );
    controller.open_session(
        SESSION_TYPE_VIDEO,
        None,
        None,
        OpenSessionRequest::Video {
            config: Some(VideoConfig::default()),
            callback: video_callback.clone(),
        },
    );
    controller.open_session(
        SESSION_TYPE_RTT,
        None,
        None,
        OpenSessionRequest::Text {
            config: Some(TextConfig::default()),
            callback: text_callback.clone(),
        },
    );

    assert_eq!(controller.session_count(), 3);
    wait_for(|| {
        !bridge.message_tags(1).is_empty()
            && !bridge.message_tags(2).is_empty()
            && !bridge.message_tags(3).is_empty()
    })
    .await;

    bridge.inject(
        1,
        WireWriter::tagged(audio::EVENT_OPEN_SESSION_SUCCESS).into_bytes(),
    );
    bridge.inject(
        2,
        WireWriter::tagged(video::EVENT_OPEN_SESSION_SUCCESS).into_bytes(),
    );
    bridge.inject(
        3,
        WireWriter::tagged(text::EVENT_OPEN_SESSION_SUCCESS).into_bytes(),
    );

    wait_for(|| audio_callback.open_success_count() == 1).await;
    wait_for(|| video_callback.session.lock().is_some()).await;
    wait_for(|| text_callback.session.lock().is_some()).await;

    assert_eq!(
        audio_callback.session.lock().as_ref().unwrap().session_id(),
        1
    );
    assert_eq!(
        video_callback.session.lock().as_ref().unwrap().session_id(),
        2
    );
    assert_eq!(
        text_callback.session.lock().as_ref().unwrap().session_id(),
        3
    );
}

#[tokio::test]
async fn close_session_forwards_and_unregisters() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let callback = RecordingAudioCallback::new();

    controller.open_session(
        SESSION_TYPE_AUDIO,
        None,
        None,
        OpenSessionRequest::Audio {
            config: None,
            callback: callback.clone(),
        },
    );
    wait_for(|| !bridge.message_tags(1).is_empty()).await;
    bridge.inject(
        1,
        WireWriter::tagged(audio::EVENT_OPEN_SESSION_SUCCESS).into_bytes(),
    );
    wait_for(|| callback.open_success_count() == 1).await;

    let session = controller.session(1).expect("registered session");
    controller.close_session(&session);

    wait_for(|| bridge.close_count(1) == 1).await;
    wait_for(|| !controller.is_session_open(1)).await;
    assert_eq!(bridge.listeners.len(), 0);
}

#[tokio::test]
async fn unbind_force_closes_every_session_and_clears_listeners() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());
    let audio_callback = RecordingAudioCallback::new();
    let video_callback = RecordingVideoCallback::new();

    controller.open_session(
        SESSION_TYPE_AUDIO,
        None,
        None,
        OpenSessionRequest::Audio {
            config: None,
            callback: audio_callback.clone(),
        },
    );
    controller.open_session(
        SESSION_TYPE_VIDEO,
        None,
        None,
        OpenSessionRequest::Video {
            config: None,
            callback: video_callback.clone(),
        },
    );
    wait_for(|| !bridge.message_tags(1).is_empty() && !bridge.message_tags(2).is_empty()).await;

    controller.on_unbind();

    wait_for(|| bridge.close_count(1) == 1 && bridge.close_count(2) == 1).await;
    assert_eq!(controller.session_count(), 0);
    assert_eq!(bridge.listeners.len(), 0);
}

#[tokio::test]
async fn generate_video_sprop_delegates_to_the_engine() {
    init_tracing();
    let bridge = TestBridge::new();
    let controller = ImsMediaController::new(bridge.clone(), bridge.listeners.clone());

    let configs = vec![VideoConfig::default(), VideoConfig::default()];
    assert_eq!(
        controller.generate_video_sprop(&configs),
        Some("sprop-sets:2".to_string())
    );
}

#[tokio::test]
async fn offload_controller_routes_audio_to_the_hal_and_video_locally() {
    init_tracing();
    let bridge = TestBridge::new();
    let hal = TestHal::new();
    let controller =
        ImsMediaController::with_audio_offload(bridge.clone(), bridge.listeners.clone(), hal.clone());
    let audio_callback = RecordingAudioCallback::new();
    let video_callback = RecordingVideoCallback::new();

    controller.open_session(
        SESSION_TYPE_AUDIO,
        None,
        None,
        OpenSessionRequest::Audio {
            config: Some(AudioConfig::default()),
            callback: audio_callback.clone(),
        },
    );
    controller.open_session(
        SESSION_TYPE_VIDEO,
        None,
        None,
        OpenSessionRequest::Video {
            config: None,
            callback: video_callback.clone(),
        },
    );

    wait_for(|| !hal.calls.lock().is_empty()).await;
    assert!(matches!(
        hal.calls.lock()[0],
        HalCall::OpenSession { session_id: 1, .. }
    ));

    // Video never touches the HAL.
    wait_for(|| !bridge.message_tags(2).is_empty()).await;
    assert_eq!(bridge.message_tags(2), vec![video::CMD_OPEN_SESSION]);
    assert_eq!(hal.calls.lock().len(), 1);
}
