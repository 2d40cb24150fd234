//! Session dispatchers
//!
//! One module per media type, all built on the same pattern: a
//! cloneable public handle whose methods append tagged messages to a
//! per-session unbounded queue, and a dedicated consumer task that pops
//! and dispatches strictly in arrival order. Application commands and
//! listener events share the queue, so an event can never interleave
//! with a command mid-handler, and commands reach the engine in the
//! order the application issued them.
//!
//! The execution backend (local engine vs. offload HAL) is chosen once
//! at construction and injected as a variant; command handlers never
//! re-check the mode themselves.

pub mod audio;
pub mod text;
pub mod video;

/// Called by a session's consumer task when the session reaches a
/// terminal state, so the owning registry can drop its entry.
pub(crate) type TerminationHook = Option<Box<dyn Fn(i32) + Send + Sync>>;
