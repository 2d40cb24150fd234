//! Inbound event listeners
//!
//! One listener per session, installed on the transport the session
//! runs over: local listeners implement [`NativeListener`](crate::native::NativeListener)
//! and decode the flat binary form; the audio offload listener
//! implements [`HalSessionListener`](crate::hal::HalSessionListener) and
//! converts structured HAL values. Either way the only thing a listener
//! does on the delivery thread is decode and append to the owning
//! session's queue; all real processing happens on the session's own
//! consumer.

pub mod audio;
pub mod text;
pub mod video;
