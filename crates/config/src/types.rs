//! Shared tags used across every media type

use serde::{Deserialize, Serialize};

/// Direction of an RTP media flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum MediaDirection {
    /// No media flows in either direction
    NoFlow = 0,
    /// Device sends outgoing media but does not receive
    SendOnly = 1,
    /// Device receives incoming media but does not send
    ReceiveOnly = 2,
    /// Media flows in both directions
    SendReceive = 3,
    /// Session is established but media is put on hold
    Inactive = 4,
}

impl MediaDirection {
    /// Wire representation of the direction tag.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode a wire tag; unknown values yield `None`.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::NoFlow),
            1 => Some(Self::SendOnly),
            2 => Some(Self::ReceiveOnly),
            3 => Some(Self::SendReceive),
            4 => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl Default for MediaDirection {
    fn default() -> Self {
        Self::NoFlow
    }
}

/// Radio access network the media flow currently rides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum AccessNetwork {
    Unknown = 0,
    Geran = 1,
    Utran = 2,
    Eutran = 3,
    Cdma2000 = 4,
    Iwlan = 5,
    Ngran = 6,
}

impl AccessNetwork {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Geran),
            2 => Some(Self::Utran),
            3 => Some(Self::Eutran),
            4 => Some(Self::Cdma2000),
            5 => Some(Self::Iwlan),
            6 => Some(Self::Ngran),
            _ => None,
        }
    }
}

impl Default for AccessNetwork {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Result code carried by asynchronous session events.
///
/// `None` means the operation succeeded; everything else names the
/// reason the native engine or the HAL rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum RtpError {
    /// Success
    None = 0,
    /// Invalid parameters passed in the request
    InvalidParam = 1,
    /// The RTP stack is not ready to handle the request
    NotReady = 2,
    /// Not able to allocate memory to handle the request
    NoMemory = 3,
    /// Not able to allocate resources (e.g. RTP session) for the request
    NoResources = 4,
    /// The requested port number is not available
    PortUnavailable = 5,
    /// The request is not supported by the implementation
    NotSupported = 6,
}

impl RtpError {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode a wire error code; unknown values degrade to `NotSupported`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::None,
            1 => Self::InvalidParam,
            2 => Self::NotReady,
            3 => Self::NoMemory,
            4 => Self::NoResources,
            5 => Self::PortUnavailable,
            _ => Self::NotSupported,
        }
    }

    /// True when the code reports success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_round_trip() {
        for dir in [
            MediaDirection::NoFlow,
            MediaDirection::SendOnly,
            MediaDirection::ReceiveOnly,
            MediaDirection::SendReceive,
            MediaDirection::Inactive,
        ] {
            assert_eq!(MediaDirection::from_i32(dir.as_i32()), Some(dir));
        }
        assert_eq!(MediaDirection::from_i32(99), None);
    }

    #[test]
    fn rtp_error_unknown_code_degrades() {
        assert_eq!(RtpError::from_i32(42), RtpError::NotSupported);
        assert!(RtpError::from_i32(0).is_success());
    }
}
