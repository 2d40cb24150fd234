//! Error types for the session dispatch core
//!
//! Failures here are deliberately narrow: transport faults on either
//! bridge are caught at the call site and logged, never propagated into
//! the session's queue consumer. The types below exist for the seams
//! where a `Result` is the honest signature: codec decode, bridge
//! sends, registry lookups.

use thiserror::Error;

/// Result type alias for session-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for the dispatch core.
#[derive(Error, Debug)]
pub enum Error {
    /// Wire codec failure
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Local native bridge failure
    #[error("native bridge error: {0}")]
    Native(#[from] NativeError),

    /// Offload HAL transport failure
    #[error("hal transport error: {0}")]
    Hal(#[from] HalError),

    /// No session registered under the given id
    #[error("session {0} not found")]
    SessionNotFound(i32),
}

/// Errors produced while encoding or decoding the flat binary wire form.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input buffer ended before the payload did
    #[error("truncated message: needed {needed} more bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// Leading message tag is not part of the protocol
    #[error("unknown message tag {0}")]
    UnknownTag(i32),

    /// A field carried a value outside its defined range
    #[error("invalid value {value} for field {field}")]
    InvalidValue { field: &'static str, value: i64 },

    /// Remote address string did not parse
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// String field was not valid UTF-8
    #[error("invalid utf-8 in field {0}")]
    InvalidUtf8(&'static str),
}

/// Errors surfaced by the in-process native engine bridge.
#[derive(Error, Debug)]
pub enum NativeError {
    /// The engine has no session under this id
    #[error("native session {0} is not open")]
    SessionNotOpen(i32),

    /// The engine rejected the message
    #[error("native transport failure: {0}")]
    Transport(String),
}

/// Errors surfaced by the offload HAL transport.
///
/// These are the binder-fault analogue: the dispatcher catches them,
/// logs, and carries on without delivering anything to the application.
#[derive(Error, Debug)]
pub enum HalError {
    /// RPC to the HAL process failed
    #[error("hal transport failure: {0}")]
    Transport(String),

    /// The HAL does not implement the requested operation
    #[error("operation not supported by the hal")]
    Unsupported,
}
