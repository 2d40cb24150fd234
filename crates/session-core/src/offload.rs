//! Offload execution path
//!
//! Audio is the only media type with a hardware offload path in this
//! design. The service wraps the [`MediaHal`] entry point and applies
//! the transport-fault policy: RPC failures are logged and swallowed,
//! never surfaced to the application.

use std::sync::Arc;

use tracing::{debug, error};

use crate::hal::{MediaHal, RtpConfig};

/// Audio session entry point into the offload HAL process.
#[derive(Clone)]
pub struct AudioOffloadService {
    hal: Arc<dyn MediaHal>,
}

impl AudioOffloadService {
    pub fn new(hal: Arc<dyn MediaHal>) -> Self {
        Self { hal }
    }

    /// Ask the HAL to create a session. The result arrives later as an
    /// open-success or open-failure event on the dispatcher's queue.
    pub fn open_session(&self, session_id: i32, config: Option<RtpConfig>) {
        debug!(session_id, "opening offload session");
        if let Err(fault) = self.hal.open_session(session_id, config) {
            error!(session_id, %fault, "openSession");
        }
    }

    /// Tear down the HAL session with the given id.
    pub fn close_session(&self, session_id: i32) {
        debug!(session_id, "closing offload session");
        if let Err(fault) = self.hal.close_session(session_id) {
            error!(session_id, %fault, "closeSession");
        }
    }
}
