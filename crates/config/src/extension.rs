//! RTP header extensions (RFC 8285)

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One RTP header extension element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpHeaderExtension {
    /// Local identifier negotiated for this extension (1..=14 for the
    /// one-byte header form)
    pub local_identifier: u8,
    /// Raw extension payload
    pub extension_data: Bytes,
}

impl RtpHeaderExtension {
    pub fn new(local_identifier: u8, extension_data: impl Into<Bytes>) -> Self {
        Self {
            local_identifier,
            extension_data: extension_data.into(),
        }
    }
}
