//! Codec identity and elementary-stream format enums.

use serde::{Deserialize, Serialize};

/// Elementary video codec identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    H264,
    H265,
    Vp8,
    Vp9,
    Jpeg,
    /// The stream carried a codec tag we do not recognize.
    Unknown,
}

impl Codec {
    /// MIME identity handed to the decoder.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::H264 => "video/h264",
            Self::H265 => "video/h265",
            Self::Vp8 => "video/x-vnd.on2.vp8",
            Self::Vp9 => "video/x-vnd.on2.vp9",
            Self::Jpeg => "image/jpeg",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable codec name (for display/logging).
    pub fn display_name(self) -> &'static str {
        match self {
            Self::H264 => "H.264/AVC",
            Self::H265 => "H.265/HEVC",
            Self::Vp8 => "VP8",
            Self::Vp9 => "VP9",
            Self::Jpeg => "Motion-JPEG",
            Self::Unknown => "unknown",
        }
    }
}

/// Elementary-stream framing format, selected from the file extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamFormat {
    /// Annex-B byte stream carrying H.264 NAL units.
    H264,
    /// Annex-B byte stream carrying H.265 NAL units.
    H265,
    /// IVF container wrapping VP8/VP9 frames.
    Ivf,
    /// Concatenated JPEG pictures (motion-JPEG).
    Mjpeg,
}

impl StreamFormat {
    pub fn file_extensions(self) -> &'static [&'static str] {
        match self {
            Self::H264 => &["264", "h264", "jsv", "avc", "26l", "jvt"],
            Self::H265 => &["265", "h265", "bin"],
            Self::Ivf => &["ivf", "vp8", "vp9"],
            Self::Mjpeg => &["jpg", "jpeg", "mjpg", "mjpeg"],
        }
    }

    /// Codec identity known before looking at the stream contents.
    ///
    /// IVF declares its codec in the file header, so it has no hint here.
    pub fn codec_hint(self) -> Option<Codec> {
        match self {
            Self::H264 => Some(Codec::H264),
            Self::H265 => Some(Codec::H265),
            Self::Mjpeg => Some(Codec::Jpeg),
            Self::Ivf => None,
        }
    }
}
