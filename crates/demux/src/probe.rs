//! Input probing — select the framing strategy from the file extension.

use es_common::{DemuxError, DemuxResult, StreamFormat};
use std::path::Path;

/// Detect the elementary-stream format from a file extension.
///
/// Unknown extensions fail: container formats (MP4, MKV, ...) belong to a
/// general container demuxer, not to the raw elementary paths here.
pub fn detect_format(path: &Path) -> DemuxResult<StreamFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "264" | "h264" | "jsv" | "avc" | "26l" | "jvt" => Ok(StreamFormat::H264),
        "265" | "h265" | "bin" => Ok(StreamFormat::H265),
        "ivf" | "vp8" | "vp9" => Ok(StreamFormat::Ivf),
        "jpg" | "jpeg" | "mjpg" | "mjpeg" => Ok(StreamFormat::Mjpeg),
        _ => Err(DemuxError::UnsupportedFormat { extension: ext }),
    }
}
