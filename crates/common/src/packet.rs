//! Stream metadata — output of probing, input to decoder setup.

use crate::codec::Codec;
use crate::types::Resolution;

/// Metadata for one elementary stream, established at open time.
#[derive(Clone, Debug)]
pub struct StreamInfo {
    /// Codec identity (from the file extension, or the IVF file header).
    pub codec: Codec,
    /// Coded resolution, when the container declares one (IVF only).
    pub resolution: Option<Resolution>,
    /// Container-level codec configuration data (SPS/PPS etc.).
    ///
    /// Raw elementary streams carry none; container demuxers populate it.
    pub codec_data: Vec<u8>,
}

impl StreamInfo {
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            resolution: None,
            codec_data: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stream_info_is_bare() {
        let info = StreamInfo::new(Codec::H264);
        assert_eq!(info.codec, Codec::H264);
        assert!(info.resolution.is_none());
        assert!(info.codec_data.is_empty());
    }
}
