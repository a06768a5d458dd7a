//! Bounded read-ahead byte cache.
//!
//! Holds the unread tail of a stream in a fixed buffer. Boundary scanners
//! operate on the valid window `[read_offset, filled)`; when the window runs
//! low, `ensure_lookahead` compacts the unread tail to the front and refills
//! from the source. The buffer is allocated once and never grows, which is
//! what keeps extraction memory-bounded on arbitrarily long streams.

use std::io::Read;

/// Fixed-capacity stream cache with a read cursor.
///
/// Invariant: `0 <= read_offset <= filled <= capacity`.
pub struct ByteCache {
    data: Box<[u8]>,
    /// Start of not-yet-consumed data.
    read_offset: usize,
    /// End of valid data.
    filled: usize,
    /// Look-ahead guaranteed after `read_offset` while the source lasts
    /// (the assumed maximum unit size).
    lookahead: usize,
    /// The source returned fewer bytes than requested (or failed); no
    /// further reads will be issued.
    read_exhausted: bool,
}

impl ByteCache {
    /// Allocate a cache guaranteeing `lookahead` bytes of scannable data.
    ///
    /// `capacity` must be at least twice the look-ahead so that compaction
    /// always frees room for a refill.
    pub fn new(lookahead: usize, capacity: usize) -> Self {
        assert!(lookahead > 0, "look-ahead must be > 0");
        assert!(
            capacity >= lookahead * 2,
            "cache must hold the scan window plus refill room"
        );
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            read_offset: 0,
            filled: 0,
            lookahead,
            read_exhausted: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn read_exhausted(&self) -> bool {
        self.read_exhausted
    }

    /// The valid window scanners may look at.
    pub fn window(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Borrow a range of valid bytes.
    pub fn range(&self, start: usize, end: usize) -> &[u8] {
        debug_assert!(start <= end && end <= self.filled);
        &self.data[start..end]
    }

    /// Move the read cursor to an absolute offset inside the valid window.
    pub fn seek_to(&mut self, offset: usize) {
        debug_assert!(offset <= self.filled);
        self.read_offset = offset;
    }

    /// Guarantee `lookahead` bytes of valid data past the read cursor,
    /// unless the source is exhausted.
    ///
    /// Compacts the unread tail to the front when free space runs low, then
    /// issues a single read. A short read or a read error marks the source
    /// exhausted; the error itself is swallowed (conservative end-of-stream).
    pub fn ensure_lookahead<R: Read>(&mut self, source: &mut R) {
        if self.read_exhausted {
            return;
        }
        // Already a full unit of runway past the cursor.
        if self.read_offset + self.lookahead < self.filled {
            return;
        }
        if self.filled + self.lookahead >= self.capacity() {
            self.data.copy_within(self.read_offset..self.filled, 0);
            self.filled -= self.read_offset;
            self.read_offset = 0;
        }
        let free = self.capacity() - self.filled;
        let got = source.read(&mut self.data[self.filled..]).unwrap_or(0);
        if got < free {
            self.read_exhausted = true;
        }
        self.filled += got;
    }

    /// Discard the current window and read up to `len` bytes into the front
    /// of the buffer. Returns how many bytes actually arrived; fewer than
    /// `len` means the source ended first.
    ///
    /// Used by fixed-framing containers, where record lengths are declared
    /// up front instead of discovered by scanning.
    pub fn refill_exact<R: Read>(
        &mut self,
        source: &mut R,
        len: usize,
    ) -> std::io::Result<usize> {
        debug_assert!(len <= self.capacity());
        self.read_offset = 0;
        self.filled = 0;
        while self.filled < len {
            match source.read(&mut self.data[self.filled..len]) {
                Ok(0) => break,
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self.filled)
    }
}
