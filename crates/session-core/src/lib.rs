//! IMS media session dispatch core
//!
//! A session-oriented asynchronous command/event dispatcher for IMS
//! media flows, with three per-media-type dispatchers (audio, video,
//! real-time text) sharing one design:
//!
//! - every application command and every inbound engine/HAL event is a
//!   tagged message on **one ordered, single-consumer queue per
//!   session**, so commands apply in issue order and events never
//!   interleave with a command mid-handler;
//! - the execution path (in-process native engine over a flat binary
//!   protocol, or hardware offload HAL over structured RPC) is chosen
//!   once at construction and injected as a variant;
//! - results only ever reach the application through per-session
//!   callback traits; commands are fire-and-forget with no synchronous
//!   error path.
//!
//! The [`controller::ImsMediaController`] registry creates and tears
//! down sessions by monotonically increasing id; the
//! [`codec`] module converts configs between their public form, the
//! binary wire form, and the HAL argument form.
//!
//! ```no_run
//! use std::sync::Arc;
//! use imsmedia_session_core::{ImsMediaController, ListenerRegistry, OpenSessionRequest};
//! use imsmedia_session_core::SESSION_TYPE_AUDIO;
//! # use imsmedia_session_core::native::NativeBridge;
//! # fn engine() -> Arc<dyn NativeBridge> { unimplemented!() }
//! # struct App;
//! # impl imsmedia_session_core::AudioSessionCallback for App {}
//!
//! let listeners = Arc::new(ListenerRegistry::new());
//! let controller = ImsMediaController::new(engine(), listeners);
//! controller.open_session(
//!     SESSION_TYPE_AUDIO,
//!     None,
//!     None,
//!     OpenSessionRequest::Audio { config: None, callback: Arc::new(App) },
//! );
//! ```

pub mod callback;
pub mod codec;
pub mod controller;
pub mod error;
pub mod hal;
pub mod listener;
pub mod local;
pub mod native;
pub mod offload;
pub mod session;
pub mod types;

pub use callback::{AudioSessionCallback, TextSessionCallback, VideoSessionCallback};
pub use controller::{ImsMediaController, MediaSession, OpenSessionRequest};
pub use error::{CodecError, Error, HalError, NativeError, Result};
pub use local::{AudioLocalSession, LocalService, TextLocalSession, VideoLocalSession};
pub use native::{ListenerRegistry, NativeBridge, NativeListener};
pub use offload::AudioOffloadService;
pub use session::audio::{AudioSession, OpenedAudioSession};
pub use session::text::TextSession;
pub use session::video::VideoSession;
pub use types::{
    OpenSessionParams, SessionState, SurfaceHandle, SESSION_TYPE_AUDIO, SESSION_TYPE_RTT,
    SESSION_TYPE_VIDEO,
};

// The public config vocabulary, re-exported for downstream convenience.
pub use imsmedia_config as config;
