//! JPEG marker scanning for motion-JPEG streams.
//!
//! A motion-JPEG stream is a plain concatenation of JPEG pictures, so
//! picture boundaries are SOI markers (`FF D8`) — but a picture may embed a
//! thumbnail JPEG, with its own SOI/EOI pair, inside an APP segment. The
//! scanner counts SOI/EOI nesting and skips APP payloads by their declared
//! length; only an SOI that raises the nesting depth to 1 starts a picture.

use byteorder::{BigEndian, ByteOrder};

/// Marker-introducer byte.
const MARKER_PREFIX: u8 = 0xFF;
/// Start-of-image marker code.
const SOI: u8 = 0xD8;
/// End-of-image marker code.
const EOI: u8 = 0xD9;
/// APP segment marker codes (`FF E0` .. `FF EF`).
const APP_FIRST: u8 = 0xE0;
const APP_LAST: u8 = 0xEF;

/// Width of the 2-byte marker sync word.
pub const MARKER_LEN: usize = 2;

/// Re-entrant marker scan state.
///
/// The scanner only ever sees the stream as consecutive 2-byte windows, so
/// skipping an APP payload whose length field may not even be buffered yet
/// has to be spread across calls: `awaiting_length` marks that the next
/// window holds the big-endian length field, and `skip_bytes` counts
/// positions to pass over without interpretation.
#[derive(Debug, Default)]
pub struct JpegScanState {
    /// SOI/EOI nesting depth; a new top-level picture is depth 1.
    soi_depth: i32,
    /// Positions left to pass over (inside an APP payload).
    skip_bytes: usize,
    /// The next 2-byte window is an APP segment length field.
    awaiting_length: bool,
}

impl JpegScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step the state machine over the 2-byte window at one scan position.
    /// Returns true iff the position starts a new top-level picture.
    pub fn is_sync_word(&mut self, buf: &[u8]) -> bool {
        debug_assert!(buf.len() >= MARKER_LEN);

        if self.skip_bytes > 0 {
            self.skip_bytes -= 1;
            return false;
        }

        if self.awaiting_length {
            // The length field covers itself plus the payload. This position
            // sits on the first length byte, so (length - 1) more positions
            // remain to pass over.
            let length = BigEndian::read_u16(buf) as usize;
            self.skip_bytes = length.saturating_sub(1);
            self.awaiting_length = false;
            return false;
        }

        if buf[0] != MARKER_PREFIX {
            return false;
        }

        // APP segments inside the first picture are notorious for carrying
        // embedded SOI/EOI pairs (thumbnails); skip their payload by length.
        if (APP_FIRST..=APP_LAST).contains(&buf[1]) && self.soi_depth == 1 {
            // Only 2 bytes are visible per call, so the length field gets
            // picked up on a later re-entry; first step past the marker code
            // itself, which will sit at buf[0] next time.
            self.awaiting_length = true;
            self.skip_bytes = 1;
            return false;
        }

        if buf[1] == SOI {
            self.soi_depth += 1;
        }
        if buf[1] == EOI {
            self.soi_depth -= 1;
        }

        buf[1] == SOI && self.soi_depth == 1
    }

    /// Scan `window` from `from`, stepping the state machine at every
    /// position, and return the absolute offset of the next picture
    /// boundary.
    pub fn find_boundary(&mut self, window: &[u8], from: usize) -> Option<usize> {
        if from + MARKER_LEN > window.len() {
            return None;
        }
        for i in from..=window.len() - MARKER_LEN {
            if self.is_sync_word(&window[i..]) {
                return Some(i);
            }
        }
        None
    }
}
