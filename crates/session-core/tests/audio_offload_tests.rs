//! Offload-mode audio session behavior: the HAL handshake, the
//! command-set asymmetry between modes, and HAL callback delivery.

mod common;

use std::sync::Arc;

use imsmedia_config::{AudioConfig, MediaQualityThreshold, RtpError, RtpHeaderExtension};
use imsmedia_session_core::codec::hal as hal_codec;
use imsmedia_session_core::hal;
use imsmedia_session_core::hal::HalSessionListener;
use imsmedia_session_core::{
    AudioOffloadService, AudioSession, OpenSessionParams, OpenedAudioSession,
};

use common::*;

const SESSION_ID: i32 = 1;

fn audio_config() -> AudioConfig {
    AudioConfig {
        remote_rtp_address: Some("10.1.2.3:5004".parse().unwrap()),
        codec_type: AudioConfig::CODEC_AMR_WB,
        dscp: 46,
        ..AudioConfig::default()
    }
}

struct Fixture {
    hal: Arc<TestHal>,
    hal_session: Arc<TestHalSession>,
    callback: Arc<RecordingAudioCallback>,
    session: AudioSession,
}

async fn opened_session() -> Fixture {
    init_tracing();
    let hal = TestHal::new();
    let hal_session = TestHalSession::new();
    let callback = RecordingAudioCallback::new();
    let service = AudioOffloadService::new(hal.clone());
    let session = AudioSession::offload(SESSION_ID, callback.clone(), service);

    session.open_session(OpenSessionParams::new(None, None, Some(audio_config())));
    wait_for(|| !hal.calls.lock().is_empty()).await;

    // The HAL answers asynchronously with its per-session object.
    session.on_open_session_success(OpenedAudioSession::Offload(hal_session.clone()));
    wait_for(|| callback.open_success_count() == 1).await;

    Fixture {
        hal,
        hal_session,
        callback,
        session,
    }
}

#[tokio::test]
async fn open_converts_the_config_and_installs_the_listener() {
    let fixture = opened_session().await;

    let calls = fixture.hal.calls.lock();
    let HalCall::OpenSession { session_id, config } = &calls[0] else {
        panic!("expected openSession, got {:?}", calls[0]);
    };
    assert_eq!(*session_id, SESSION_ID);
    assert_eq!(
        *config,
        hal_codec::audio_config_to_hal(Some(&audio_config()))
    );

    // The open-success bind installed the offload listener on the HAL
    // session before the application callback fired.
    assert!(fixture.hal_session.listener.lock().is_some());
}

#[tokio::test]
async fn delete_and_confirm_config_are_noops_on_an_offload_session() {
    let fixture = opened_session().await;

    fixture.session.delete_config(audio_config());
    fixture.session.confirm_config(audio_config());
    settle().await;

    // The spy HAL session saw no call at all.
    assert_eq!(fixture.hal_session.call_count(), 0);
}

#[tokio::test]
async fn add_config_folds_into_a_hal_modify() {
    let fixture = opened_session().await;

    fixture.session.add_config(audio_config());
    wait_for(|| fixture.hal_session.call_count() == 1).await;

    let calls = fixture.hal_session.calls.lock();
    assert!(matches!(
        calls.last().unwrap(),
        HalSessionCall::ModifySession(Some(_))
    ));
}

#[tokio::test]
async fn dtmf_commands_map_to_their_hal_counterparts() {
    let fixture = opened_session().await;

    fixture.session.send_dtmf('7', 120);
    fixture.session.start_dtmf('3');
    fixture.session.stop_dtmf();
    wait_for(|| fixture.hal_session.call_count() == 3).await;

    let calls = fixture.hal_session.calls.lock();
    assert!(matches!(
        calls[1],
        HalSessionCall::SendDtmf { digit: '7', duration_millis: 120 }
    ));
    assert!(matches!(calls[2], HalSessionCall::StartDtmf { digit: '3' }));
    assert!(matches!(calls[3], HalSessionCall::StopDtmf));
}

#[tokio::test]
async fn header_extension_and_threshold_convert_to_hal_forms() {
    let fixture = opened_session().await;

    fixture
        .session
        .send_header_extension(vec![RtpHeaderExtension::new(4, vec![1, 2])]);
    let threshold = MediaQualityThreshold {
        rtp_inactivity_timer_millis: vec![3000],
        notify_current_status: true,
        ..MediaQualityThreshold::default()
    };
    fixture.session.set_media_quality_threshold(threshold.clone());
    wait_for(|| fixture.hal_session.call_count() == 2).await;

    let calls = fixture.hal_session.calls.lock();
    match &calls[1] {
        HalSessionCall::SendHeaderExtension(extensions) => {
            assert_eq!(extensions.len(), 1);
            assert_eq!(extensions[0].local_id, 4);
            assert_eq!(extensions[0].data, vec![1, 2]);
        }
        other => panic!("expected sendHeaderExtension, got {other:?}"),
    }
    match &calls[2] {
        HalSessionCall::SetMediaQualityThreshold(converted) => {
            assert_eq!(*converted, hal_codec::threshold_to_hal(Some(&threshold)));
        }
        other => panic!("expected setMediaQualityThreshold, got {other:?}"),
    }
}

#[tokio::test]
async fn hal_callbacks_flow_back_as_typed_events() {
    let fixture = opened_session().await;
    // The same object the dispatcher installed on the HAL session.
    let listener = fixture.session.offload_listener().expect("offload listener");

    let hal_config = hal_codec::audio_config_to_hal(Some(&audio_config()));
    listener.on_modify_session_response(hal_config.clone(), RtpError::None.as_i32());
    listener.on_first_media_packet_received(hal_config.clone());
    listener.on_dtmf_received('5', 90);
    listener.notify_media_quality_status(hal::MediaQualityStatus {
        rtp_inactivity_time_millis: 100,
        rtcp_inactivity_time_millis: 200,
        rtp_packet_loss_rate: 15,
        rtp_jitter_millis: 200,
    });
    listener.on_call_quality_changed(hal::CallQuality {
        call_duration: 9000,
        ..hal::CallQuality::default()
    });

    wait_for(|| fixture.callback.event_count() == 6).await;
    let events = fixture.callback.events.lock();
    assert!(matches!(
        &events[1],
        AudioCallbackEvent::ModifyResponse(Some(config), RtpError::None)
            if *config == audio_config()
    ));
    assert!(matches!(&events[2], AudioCallbackEvent::FirstMediaPacket(Some(_))));
    assert!(matches!(
        &events[3],
        AudioCallbackEvent::DtmfReceived { digit: '5', duration_millis: 90 }
    ));
    assert!(matches!(
        &events[4],
        AudioCallbackEvent::QualityStatus(status) if status.rtp_packet_loss_rate == 15
    ));
    assert!(matches!(
        &events[5],
        AudioCallbackEvent::CallQuality(quality) if quality.call_duration == 9000
    ));
}

#[tokio::test]
async fn hal_session_closed_terminates_the_dispatcher() {
    let fixture = opened_session().await;
    let listener = fixture.hal_session.listener();

    listener.on_session_closed();
    wait_for(|| {
        fixture
            .callback
            .events
            .lock()
            .iter()
            .any(|event| matches!(event, AudioCallbackEvent::Closed))
    })
    .await;

    // Post-terminal commands go nowhere.
    fixture.session.modify_session(audio_config());
    settle().await;
    assert_eq!(fixture.hal_session.call_count(), 0);
}

#[tokio::test]
async fn open_failure_before_success_reports_once() {
    init_tracing();
    let hal = TestHal::new();
    let callback = RecordingAudioCallback::new();
    let service = AudioOffloadService::new(hal.clone());
    let session = AudioSession::offload(SESSION_ID, callback.clone(), service);

    session.open_session(OpenSessionParams::new(None, None, Some(audio_config())));
    wait_for(|| !hal.calls.lock().is_empty()).await;

    session.on_open_session_failure(RtpError::NoResources);
    wait_for(|| callback.event_count() == 1).await;

    settle().await;
    let events = callback.events.lock();
    assert!(matches!(
        events[0],
        AudioCallbackEvent::OpenFailure(RtpError::NoResources)
    ));
}

#[tokio::test]
async fn close_goes_through_the_hal_entry_point() {
    let fixture = opened_session().await;

    fixture.session.close_session();
    wait_for(|| {
        fixture
            .hal
            .calls
            .lock()
            .iter()
            .any(|call| matches!(call, HalCall::CloseSession { session_id: SESSION_ID }))
    })
    .await;
}
