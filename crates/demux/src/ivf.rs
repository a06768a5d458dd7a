//! IVF container parsing (VP8/VP9 elementary frames).
//!
//! IVF is a minimal fixed-framing container: one 32-byte file header, then a
//! repeating 12-byte frame header + payload. Payloads are handed to the
//! decoder as-is; the per-frame timestamp is preserved.

use byteorder::{ByteOrder, LittleEndian};
use es_common::{Codec, DemuxError, DemuxResult, Resolution};

/// File-header magic tag.
pub const MAGIC: &[u8; 4] = b"DKIF";

/// Size of the one-time file header.
pub const FILE_HEADER_SIZE: usize = 32;

/// Size of the per-frame header.
pub const FRAME_HEADER_SIZE: usize = 12;

/// Largest frame payload accepted from a frame header, derived from the
/// largest supported coded resolution.
pub const MAX_FRAME_SIZE: usize = Resolution::MAX_SUPPORTED.nv12_byte_size();

/// The file-header fields the demuxer cares about.
#[derive(Copy, Clone, Debug)]
pub struct IvfFileHeader {
    pub codec: Codec,
    pub resolution: Resolution,
}

/// Parse the 32-byte file header.
///
/// Layout: bytes 0-3 magic `DKIF`, 4-5 version (ignored), 6-7 header size
/// (ignored), 8-11 codec fourcc, 12-13 width, 14-15 height (little-endian),
/// 16-31 unused.
pub fn parse_file_header(buf: &[u8]) -> DemuxResult<IvfFileHeader> {
    debug_assert!(buf.len() >= FILE_HEADER_SIZE);
    if &buf[0..4] != MAGIC {
        return Err(DemuxError::InvalidHeader {
            reason: "missing DKIF magic in IVF file header".into(),
        });
    }
    let codec = match &buf[8..12] {
        b"VP80" => Codec::Vp8,
        b"VP90" => Codec::Vp9,
        _ => Codec::Unknown,
    };
    let width = LittleEndian::read_u16(&buf[12..14]) as u32;
    let height = LittleEndian::read_u16(&buf[14..16]) as u32;
    Ok(IvfFileHeader {
        codec,
        resolution: Resolution::new(width, height),
    })
}

/// The per-frame record header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IvfFrameHeader {
    /// Declared payload size.
    pub size: usize,
    /// Presentation timestamp (bytes 4-11, little-endian).
    pub timestamp: u64,
}

/// Parse the 12-byte frame header.
///
/// The size field is assembled from the three low bytes only; the high byte
/// of the 32-bit field is never inspected, capping declared sizes at 24 bits.
pub fn parse_frame_header(buf: &[u8]) -> IvfFrameHeader {
    debug_assert!(buf.len() >= FRAME_HEADER_SIZE);
    let size = buf[0] as usize | (buf[1] as usize) << 8 | (buf[2] as usize) << 16;
    let timestamp = LittleEndian::read_u64(&buf[4..12]);
    IvfFrameHeader { size, timestamp }
}
