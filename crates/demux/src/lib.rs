//! `es-demux` — Streaming access-unit extraction for raw elementary streams.
//!
//! Turns a raw on-disk bitstream (Annex-B H.264/H.265, IVF-wrapped VP8/VP9,
//! or motion-JPEG) into a pull-based sequence of access units a decoder can
//! consume one at a time, over a fixed-size read-ahead cache. The whole file
//! is never resident in memory.
//!
//! Container formats (MP4, MKV, ...) are out of scope here and belong to a
//! general container demuxer; `probe` rejects their extensions.

pub mod annexb;
pub mod cache;
pub mod extractor;
pub mod ivf;
pub mod jpeg;
pub mod probe;

pub use extractor::{AccessUnit, AccessUnitExtractor};
pub use probe::detect_format;
