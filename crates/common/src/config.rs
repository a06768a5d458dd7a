//! Demuxer configuration.

use serde::{Deserialize, Serialize};

/// Ratio of cache capacity to the assumed maximum unit size. The cache holds
/// several maximum-size units so boundary scanning rarely has to compact.
const CACHE_UNITS: usize = 8;

/// Demuxer tuning knobs.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct DemuxConfig {
    /// Assumed maximum size of a single access unit, in bytes.
    ///
    /// Streams whose units exceed this are rejected
    /// (`DemuxError::MissingBoundary` / `DemuxError::FrameTooLarge`);
    /// callers feeding such streams must raise it.
    pub max_unit_size: usize,
}

impl DemuxConfig {
    pub fn new(max_unit_size: usize) -> Self {
        assert!(max_unit_size > 0, "max_unit_size must be > 0");
        Self { max_unit_size }
    }

    /// Byte capacity of the read-ahead cache.
    pub fn cache_capacity(self) -> usize {
        self.max_unit_size * CACHE_UNITS
    }
}

impl Default for DemuxConfig {
    fn default() -> Self {
        // Assume a single coded frame stays under 4 MiB.
        Self {
            max_unit_size: 4 * 1024 * 1024,
        }
    }
}
