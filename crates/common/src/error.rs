//! Central error types for the demuxer (thiserror-based).

use thiserror::Error;

use crate::codec::Codec;

/// Demuxing/extraction errors.
///
/// End-of-stream is deliberately not represented here: extraction surfaces
/// it as a clean `Ok(None)` so callers never have to tell it apart from a
/// real failure.
#[derive(Error, Debug)]
pub enum DemuxError {
    /// The file extension matches none of the supported elementary formats.
    #[error("Unsupported input format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Unsupported codec: {0:?}")]
    UnsupportedCodec(Codec),

    #[error("Invalid stream header: {reason}")]
    InvalidHeader { reason: String },

    /// A frame header declared a payload larger than the demuxer accepts.
    #[error("Frame of {size} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },

    /// The stream announced more payload bytes than it delivered.
    #[error("Truncated data: expected {expected} bytes, got {got}")]
    TruncatedData { expected: usize, got: usize },

    /// No unit boundary found even though the source is not exhausted: a
    /// single unit is larger than the configured maximum.
    #[error("No unit boundary within {lookahead} bytes of look-ahead")]
    MissingBoundary { lookahead: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for demux operations.
pub type DemuxResult<T> = Result<T, DemuxError>;
