//! Configuration and quality value types for IMS media sessions
//!
//! This crate defines the application-visible vocabulary shared by the
//! session dispatch core: per-media-type configuration objects
//! ([`AudioConfig`], [`VideoConfig`], [`TextConfig`]), RTCP settings,
//! codec-specific parameter blocks, quality thresholds and reports, and
//! RTP header extensions.
//!
//! Everything here is pure data. Configs are owned by the caller and
//! passed by value into session commands; the dispatch layer transcodes
//! them but never mutates a caller-supplied value.

mod audio;
mod extension;
mod quality;
mod rtcp;
mod text;
mod types;
mod video;

pub use audio::{AmrParams, AudioConfig, EvsParams};
pub use extension::RtpHeaderExtension;
pub use quality::{CallQuality, MediaQualityStatus, MediaQualityThreshold};
pub use rtcp::RtcpConfig;
pub use text::TextConfig;
pub use types::{AccessNetwork, MediaDirection, RtpError};
pub use video::VideoConfig;
