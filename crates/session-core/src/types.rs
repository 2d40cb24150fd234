//! Shared types for the session dispatch core

use std::net::UdpSocket;

/// Session type tag for an audio session (see
/// [`ImsMediaController::open_session`](crate::controller::ImsMediaController::open_session)).
pub const SESSION_TYPE_AUDIO: i32 = 0;
/// Session type tag for a video session.
pub const SESSION_TYPE_VIDEO: i32 = 1;
/// Session type tag for a real-time text session.
pub const SESSION_TYPE_RTT: i32 = 2;

/// Opaque handle to a rendering/capture surface owned by the application.
///
/// The dispatch core never interprets it; it is threaded through to the
/// native engine verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Parameters carried by an open-session command.
///
/// The sockets are the pre-opened RTP/RTCP transport endpoints handed
/// over by the application; ownership moves into the native engine (or
/// the HAL process) on open. The config may be absent; the engine then
/// opens the session with defaults and waits for a modify.
#[derive(Debug)]
pub struct OpenSessionParams<C> {
    /// Pre-bound RTP socket
    pub rtp_socket: Option<UdpSocket>,
    /// Pre-bound RTCP socket
    pub rtcp_socket: Option<UdpSocket>,
    /// Initial session configuration
    pub rtp_config: Option<C>,
}

impl<C> OpenSessionParams<C> {
    pub fn new(
        rtp_socket: Option<UdpSocket>,
        rtcp_socket: Option<UdpSocket>,
        rtp_config: Option<C>,
    ) -> Self {
        Self {
            rtp_socket,
            rtcp_socket,
            rtp_config,
        }
    }
}

/// Lifecycle state of a session dispatcher.
///
/// `PendingOpen` is the state between construction and the asynchronous
/// open result; commands that need a bound runtime handle degrade to a
/// logged no-op there. `Closed` is terminal: the consumer task exits
/// and the queue becomes unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, waiting for the asynchronous open result
    PendingOpen,
    /// Open-success arrived and the runtime handle is bound
    Open,
    /// Terminal: closed by command, unsolicited teardown, or open failure
    Closed,
}
