//! Session registry
//!
//! The controller owns the map from session id to dispatcher, allocates
//! monotonically increasing ids, and multiplexes open/close requests
//! across many concurrently open sessions of mixed media type. The map
//! is the only state shared across sessions; one mutex guards it, and a
//! session's own consumer task removes its entry when it reaches a
//! terminal state.

use std::collections::HashMap;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use imsmedia_config::{AudioConfig, TextConfig, VideoConfig};

use crate::callback::{AudioSessionCallback, TextSessionCallback, VideoSessionCallback};
use crate::hal::MediaHal;
use crate::local::LocalService;
use crate::native::{ListenerRegistry, NativeBridge};
use crate::offload::AudioOffloadService;
use crate::session::audio::AudioSession;
use crate::session::text::TextSession;
use crate::session::video::VideoSession;
use crate::session::TerminationHook;
use crate::types::{
    OpenSessionParams, SESSION_TYPE_AUDIO, SESSION_TYPE_RTT, SESSION_TYPE_VIDEO,
};

/// Per-media-type payload of an open request: the initial config plus
/// the application callback the session will report through.
pub enum OpenSessionRequest {
    Audio {
        config: Option<AudioConfig>,
        callback: Arc<dyn AudioSessionCallback>,
    },
    Video {
        config: Option<VideoConfig>,
        callback: Arc<dyn VideoSessionCallback>,
    },
    Text {
        config: Option<TextConfig>,
        callback: Arc<dyn TextSessionCallback>,
    },
}

/// A registered session of any media type.
#[derive(Debug, Clone)]
pub enum MediaSession {
    Audio(AudioSession),
    Video(VideoSession),
    Text(TextSession),
}

impl MediaSession {
    pub fn session_id(&self) -> i32 {
        match self {
            Self::Audio(session) => session.session_id(),
            Self::Video(session) => session.session_id(),
            Self::Text(session) => session.session_id(),
        }
    }

    fn close(&self) {
        match self {
            Self::Audio(session) => session.close_session(),
            Self::Video(session) => session.close_session(),
            Self::Text(session) => session.close_session(),
        }
    }

    pub fn audio(&self) -> Option<&AudioSession> {
        match self {
            Self::Audio(session) => Some(session),
            _ => None,
        }
    }

    pub fn video(&self) -> Option<&VideoSession> {
        match self {
            Self::Video(session) => Some(session),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextSession> {
        match self {
            Self::Text(session) => Some(session),
            _ => None,
        }
    }
}

struct ControllerInner {
    native: Arc<dyn NativeBridge>,
    listeners: Arc<ListenerRegistry>,
    audio_hal: Option<Arc<dyn MediaHal>>,
    sessions: Mutex<HashMap<i32, MediaSession>>,
    next_session_id: AtomicI32,
}

/// Creates, tracks and tears down media sessions.
#[derive(Clone)]
pub struct ImsMediaController {
    inner: Arc<ControllerInner>,
}

impl ImsMediaController {
    /// Controller with every media type on the local engine path.
    pub fn new(native: Arc<dyn NativeBridge>, listeners: Arc<ListenerRegistry>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                native,
                listeners,
                audio_hal: None,
                sessions: Mutex::new(HashMap::new()),
                next_session_id: AtomicI32::new(1),
            }),
        }
    }

    /// Controller that routes audio sessions through the offload HAL.
    /// Video and text stay on the local path regardless.
    pub fn with_audio_offload(
        native: Arc<dyn NativeBridge>,
        listeners: Arc<ListenerRegistry>,
        hal: Arc<dyn MediaHal>,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                native,
                listeners,
                audio_hal: Some(hal),
                sessions: Mutex::new(HashMap::new()),
                next_session_id: AtomicI32::new(1),
            }),
        }
    }

    fn local_service(&self) -> LocalService {
        LocalService::new(self.inner.native.clone(), self.inner.listeners.clone())
    }

    fn termination_hook(&self) -> TerminationHook {
        let weak = Arc::downgrade(&self.inner);
        Some(Box::new(move |session_id| {
            if let Some(inner) = weak.upgrade() {
                if inner.sessions.lock().remove(&session_id).is_some() {
                    debug!(session_id, "session removed from registry");
                }
            }
        }))
    }

    /// Open a new session.
    ///
    /// Fire-and-forget: the result arrives through the request's
    /// callback (open-success carries the dispatcher handle). A request
    /// whose `session_type` is unrecognized, or does not match the
    /// request payload's media type, is dropped without any callback.
    pub fn open_session(
        &self,
        session_type: i32,
        rtp_socket: Option<UdpSocket>,
        rtcp_socket: Option<UdpSocket>,
        request: OpenSessionRequest,
    ) {
        let session_id = self.inner.next_session_id.fetch_add(1, Ordering::SeqCst);
        debug!(session_id, session_type, "openSession");

        match (session_type, request) {
            (SESSION_TYPE_AUDIO, OpenSessionRequest::Audio { config, callback }) => {
                let session = match &self.inner.audio_hal {
                    Some(hal) => AudioSession::spawn_offload(
                        session_id,
                        callback,
                        AudioOffloadService::new(hal.clone()),
                        self.termination_hook(),
                    ),
                    None => AudioSession::spawn_local(
                        session_id,
                        callback,
                        self.local_service(),
                        self.termination_hook(),
                    ),
                };
                self.inner
                    .sessions
                    .lock()
                    .insert(session_id, MediaSession::Audio(session.clone()));
                session.open_session(OpenSessionParams::new(rtp_socket, rtcp_socket, config));
            }
            (SESSION_TYPE_VIDEO, OpenSessionRequest::Video { config, callback }) => {
                let session = VideoSession::spawn_local(
                    session_id,
                    callback,
                    self.local_service(),
                    self.termination_hook(),
                );
                self.inner
                    .sessions
                    .lock()
                    .insert(session_id, MediaSession::Video(session.clone()));
                session.open_session(OpenSessionParams::new(rtp_socket, rtcp_socket, config));
            }
            (SESSION_TYPE_RTT, OpenSessionRequest::Text { config, callback }) => {
                let session = TextSession::spawn_local(
                    session_id,
                    callback,
                    self.local_service(),
                    self.termination_hook(),
                );
                self.inner
                    .sessions
                    .lock()
                    .insert(session_id, MediaSession::Text(session.clone()));
                session.open_session(OpenSessionParams::new(rtp_socket, rtcp_socket, config));
            }
            (session_type, _) => {
                // No dispatcher, no callback: the request vanishes.
                warn!(session_type, "unrecognized session type; open request dropped");
            }
        }
    }

    /// Forward a close to the session; its registry entry disappears
    /// when the dispatcher terminates.
    pub fn close_session(&self, session: &MediaSession) {
        debug!(session_id = session.session_id(), "closeSession");
        session.close();
    }

    /// Stateless sprop parameter-set generation, passed straight to the
    /// native engine.
    pub fn generate_video_sprop(&self, configs: &[VideoConfig]) -> Option<String> {
        self.inner.native.generate_video_sprop(configs)
    }

    /// True while a dispatcher is registered under the id.
    pub fn is_session_open(&self, session_id: i32) -> bool {
        self.inner.sessions.lock().contains_key(&session_id)
    }

    /// Number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.inner.sessions.lock().len()
    }

    /// Look up a session handle by id.
    pub fn session(&self, session_id: i32) -> Option<MediaSession> {
        self.inner.sessions.lock().get(&session_id).cloned()
    }

    /// Service teardown: force-close every remaining session and clear
    /// the native listener table, whether or not the application asked.
    pub fn on_unbind(&self) {
        let sessions: Vec<MediaSession> = {
            let mut map = self.inner.sessions.lock();
            map.drain().map(|(_, session)| session).collect()
        };
        for session in &sessions {
            warn!(
                session_id = session.session_id(),
                "service unbinding with session still open; forcing close"
            );
            session.close();
        }
        self.inner.listeners.clear();
    }
}
