//! `es-common` — Shared types and errors for the elementary-stream demuxer.
//!
//! This crate is the foundation the demux crate builds on. It defines:
//!
//! - **Codecs**: `Codec`, `StreamFormat` (format/extension dispatch tables)
//! - **Types**: `Resolution` (newtype for safety)
//! - **Stream metadata**: `StreamInfo` (codec identity, resolution, extradata)
//! - **Errors**: `DemuxError`, `DemuxResult` (thiserror-based)
//! - **Config**: `DemuxConfig` (unit-size assumption, cache sizing)

pub mod codec;
pub mod config;
pub mod error;
pub mod packet;
pub mod types;

// Re-export commonly used items at crate root
pub use codec::{Codec, StreamFormat};
pub use config::DemuxConfig;
pub use error::{DemuxError, DemuxResult};
pub use packet::StreamInfo;
pub use types::Resolution;
