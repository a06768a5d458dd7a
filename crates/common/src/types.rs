//! Core value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Video/image resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Largest coded frame the demuxer will accept from a container header.
    pub const MAX_SUPPORTED: Self = Self {
        width: 4096,
        height: 4096,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Byte size for NV12 pixel data (Y plane + interleaved UV at half res).
    pub const fn nv12_byte_size(self) -> usize {
        let y_size = self.width as usize * self.height as usize;
        let uv_size = self.width as usize * (self.height as usize / 2);
        y_size + uv_size
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
