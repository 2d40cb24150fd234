//! Local native engine bridge
//!
//! The local execution path talks to an in-process RTP engine through a
//! session-scoped binary message protocol: a leading 4-byte tag followed
//! by the flattened payload (see [`crate::codec::wire`]). Outbound sends
//! are synchronous and expected to return quickly; inbound messages
//! arrive asynchronously on the engine's thread and are demultiplexed by
//! session id through the [`ListenerRegistry`].

use std::collections::HashMap;
use std::net::UdpSocket;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use imsmedia_config::VideoConfig;

use crate::error::NativeError;

/// Opaque channel into the local native RTP engine.
///
/// Implementations wrap the actual engine binding. Sends are in-process
/// calls, not cross-process I/O; the engine replies asynchronously via
/// the listener registered for the session id.
pub trait NativeBridge: Send + Sync {
    /// Create an engine session. `message` is the encoded open command;
    /// the sockets are handed over to the engine for the session's
    /// lifetime.
    fn open_session(
        &self,
        session_id: i32,
        rtp_socket: Option<UdpSocket>,
        rtcp_socket: Option<UdpSocket>,
        message: Bytes,
    ) -> Result<(), NativeError>;

    /// Tear down the engine session with the given id.
    fn close_session(&self, session_id: i32);

    /// Push one session-scoped command message into the engine.
    fn send_message(&self, session_id: i32, message: Bytes) -> Result<(), NativeError>;

    /// Stateless sprop-parameter-set generation for the given video
    /// configurations. Not tied to any session.
    fn generate_video_sprop(&self, configs: &[VideoConfig]) -> Option<String>;
}

/// Inbound half of the native protocol: one callback per session.
pub trait NativeListener: Send + Sync {
    /// Deliver one engine message. Called on the engine's delivery
    /// thread; implementations only decode and enqueue, never block.
    fn on_message(&self, message: Bytes);
}

/// Session-id keyed table of native listeners.
///
/// Populated when a local session opens, emptied entry-by-entry as
/// sessions close, and cleared wholesale on service teardown. This is
/// the only process-wide state on the local path; one lock guards it.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<HashMap<i32, Arc<dyn NativeListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the listener for a session id, replacing any previous one.
    pub fn register(&self, session_id: i32, listener: Arc<dyn NativeListener>) {
        self.listeners.lock().insert(session_id, listener);
    }

    /// Remove the listener for a session id.
    pub fn unregister(&self, session_id: i32) {
        self.listeners.lock().remove(&session_id);
    }

    /// Route one inbound engine message to the session's listener.
    /// Messages for unknown sessions are dropped.
    pub fn dispatch(&self, session_id: i32, message: Bytes) {
        let listener = self.listeners.lock().get(&session_id).cloned();
        match listener {
            Some(listener) => listener.on_message(message),
            None => debug!(session_id, "dropping message for unregistered session"),
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Drop every registered listener (service teardown).
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener(AtomicUsize);

    impl NativeListener for CountingListener {
        fn on_message(&self, _message: Bytes) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn dispatch_routes_by_session_id() {
        let registry = ListenerRegistry::new();
        let listener = Arc::new(CountingListener(AtomicUsize::new(0)));
        registry.register(7, listener.clone());

        registry.dispatch(7, Bytes::from_static(b"x"));
        registry.dispatch(8, Bytes::from_static(b"y"));
        assert_eq!(listener.0.load(Ordering::SeqCst), 1);

        registry.unregister(7);
        registry.dispatch(7, Bytes::from_static(b"z"));
        assert_eq!(listener.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_empties_the_table() {
        let registry = ListenerRegistry::new();
        registry.register(1, Arc::new(CountingListener(AtomicUsize::new(0))));
        registry.register(2, Arc::new(CountingListener(AtomicUsize::new(0))));
        assert_eq!(registry.len(), 2);
        registry.clear();
        assert_eq!(registry.len(), 0);
    }
}
