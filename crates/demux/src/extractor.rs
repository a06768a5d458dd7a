//! Pull-based access-unit extraction.
//!
//! `AccessUnitExtractor` owns one `ByteCache` and one framing strategy and
//! exposes the single `next_unit` operation decode loops drive. Annex-B and
//! motion-JPEG streams share the scan path (ensure look-ahead, find the next
//! sync word, emit the span in between); IVF streams read their declared
//! frame lengths instead of scanning.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use es_common::{Codec, DemuxConfig, DemuxError, DemuxResult, StreamFormat, StreamInfo};
use tracing::{debug, info};

use crate::annexb;
use crate::cache::ByteCache;
use crate::ivf;
use crate::jpeg::{self, JpegScanState};
use crate::probe;

/// One extracted access unit — a zero-copy view into the extractor's cache.
///
/// The borrow ends at the next `next_unit` call (which may refill or compact
/// the cache underneath); callers needing the bytes longer must copy them
/// out first.
#[derive(Debug)]
pub struct AccessUnit<'a> {
    /// Unit payload. May be empty: IVF frames can legitimately declare a
    /// zero-byte payload.
    pub data: &'a [u8],
    /// Presentation timestamp, when the framing carries one (IVF only).
    pub timestamp: Option<u64>,
}

/// Sync-word scanner for the self-delimiting raw formats.
enum SyncScanner {
    /// 3-byte `00 00 01` start codes (H.264/H.265).
    AnnexB,
    /// 2-byte JPEG markers with nesting/skip state.
    Jpeg(JpegScanState),
}

impl SyncScanner {
    fn sync_word_len(&self) -> usize {
        match self {
            Self::AnnexB => annexb::START_CODE_LEN,
            Self::Jpeg(_) => jpeg::MARKER_LEN,
        }
    }

    fn find_sync(&mut self, window: &[u8], from: usize) -> Option<usize> {
        match self {
            Self::AnnexB => annexb::find_start_code(window, from),
            Self::Jpeg(state) => state.find_boundary(window, from),
        }
    }
}

/// Framing strategy, fixed at open time.
enum Framing {
    /// Boundary-scanned raw stream. The cache read cursor always sits on the
    /// sync word opening the next unit to emit.
    Sync(SyncScanner),
    /// Length-prefixed IVF records.
    Ivf { frame_index: u64 },
}

/// Streaming access-unit extractor over a byte source.
///
/// Exclusively owns its source, cache, and scanner state; two extractors
/// over two sources are fully independent. Units are emitted strictly in
/// stream order.
pub struct AccessUnitExtractor<R> {
    source: R,
    cache: ByteCache,
    framing: Framing,
    info: StreamInfo,
    /// Terminal state: the final unit has been emitted.
    parse_exhausted: bool,
    /// Assumed maximum unit size (scan look-ahead and IVF size limit).
    max_unit_size: usize,
}

impl AccessUnitExtractor<BufReader<File>> {
    /// Open a file, selecting the framing from its extension.
    pub fn open(path: &Path) -> DemuxResult<Self> {
        Self::open_with_config(path, DemuxConfig::default())
    }

    pub fn open_with_config(path: &Path, config: DemuxConfig) -> DemuxResult<Self> {
        let format = probe::detect_format(path)?;
        let file = File::open(path).map_err(DemuxError::Io)?;
        Self::with_config(BufReader::new(file), format, config)
    }
}

impl<R: Read> AccessUnitExtractor<R> {
    /// Wrap an already-open byte source with the default configuration.
    pub fn new(source: R, format: StreamFormat) -> DemuxResult<Self> {
        Self::with_config(source, format, DemuxConfig::default())
    }

    /// Wrap an already-open byte source.
    ///
    /// Runs the one-time per-format initialization: IVF reads and validates
    /// its file header; Annex-B and motion-JPEG prime the cache and position
    /// the cursor on the first sync word, skipping any leading garbage.
    /// Fails if the stream holds no recognizable first boundary.
    pub fn with_config(source: R, format: StreamFormat, config: DemuxConfig) -> DemuxResult<Self> {
        let cache = ByteCache::new(config.max_unit_size, config.cache_capacity());
        let framing = match format {
            StreamFormat::H264 | StreamFormat::H265 => Framing::Sync(SyncScanner::AnnexB),
            StreamFormat::Mjpeg => Framing::Sync(SyncScanner::Jpeg(JpegScanState::new())),
            StreamFormat::Ivf => Framing::Ivf { frame_index: 0 },
        };
        let info = StreamInfo::new(format.codec_hint().unwrap_or(Codec::Unknown));

        let mut extractor = Self {
            source,
            cache,
            framing,
            info,
            parse_exhausted: false,
            max_unit_size: config.max_unit_size,
        };
        match format {
            StreamFormat::Ivf => extractor.init_ivf()?,
            _ => extractor.init_sync()?,
        }

        info!(
            codec = extractor.info.codec.display_name(),
            resolution = ?extractor.info.resolution,
            "Opened elementary stream"
        );
        Ok(extractor)
    }

    /// Stream metadata established at open time.
    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /// True once the final unit has been emitted. From then on `next_unit`
    /// keeps returning `Ok(None)` without touching the source.
    pub fn is_end_of_stream(&self) -> bool {
        self.parse_exhausted
    }

    /// Fixed byte capacity of the internal cache.
    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Pull the next access unit.
    ///
    /// `Ok(Some(unit))` hands back a view valid until the next call.
    /// `Ok(None)` is clean end-of-stream and is idempotent. Errors follow
    /// `es_common::DemuxError` and should abort extraction.
    pub fn next_unit(&mut self) -> DemuxResult<Option<AccessUnit<'_>>> {
        if self.parse_exhausted {
            return Ok(None);
        }

        match &mut self.framing {
            Framing::Sync(scanner) => {
                self.cache.ensure_lookahead(&mut self.source);

                let start = self.cache.read_offset();
                let sync_len = scanner.sync_word_len();
                let found = scanner.find_sync(self.cache.window(), start + sync_len);

                let end = match found {
                    Some(next) => next,
                    None => {
                        // The cache guarantees one full unit of look-ahead,
                        // so a missing boundary is legal only once the
                        // source is exhausted: the remaining bytes are the
                        // final unit, with no trailing delimiter implied.
                        if !self.cache.read_exhausted() {
                            return Err(DemuxError::MissingBoundary {
                                lookahead: self.max_unit_size,
                            });
                        }
                        self.parse_exhausted = true;
                        debug!("Emitting final unit at end of stream");
                        self.cache.filled()
                    }
                };

                self.cache.seek_to(end);
                Ok(Some(AccessUnit {
                    data: self.cache.range(start, end),
                    timestamp: None,
                }))
            }

            Framing::Ivf { frame_index } => {
                if self.info.codec == Codec::Unknown {
                    return Err(DemuxError::UnsupportedCodec(self.info.codec));
                }

                let got = self
                    .cache
                    .refill_exact(&mut self.source, ivf::FRAME_HEADER_SIZE)
                    .map_err(DemuxError::Io)?;
                if got < ivf::FRAME_HEADER_SIZE {
                    // A short read between records is the natural end of an
                    // IVF stream.
                    self.parse_exhausted = true;
                    debug!(frames = *frame_index, "End of IVF stream");
                    return Ok(None);
                }

                let header = ivf::parse_frame_header(self.cache.range(0, ivf::FRAME_HEADER_SIZE));
                let limit = ivf::MAX_FRAME_SIZE.min(self.cache.capacity());
                if header.size > limit {
                    return Err(DemuxError::FrameTooLarge {
                        size: header.size,
                        limit,
                    });
                }

                let got = self
                    .cache
                    .refill_exact(&mut self.source, header.size)
                    .map_err(DemuxError::Io)?;
                if got < header.size {
                    // The header promised more payload than the stream holds:
                    // corruption, not end-of-stream.
                    return Err(DemuxError::TruncatedData {
                        expected: header.size,
                        got,
                    });
                }

                *frame_index += 1;
                Ok(Some(AccessUnit {
                    data: self.cache.range(0, header.size),
                    timestamp: Some(header.timestamp),
                }))
            }
        }
    }

    /// Read and validate the IVF file header, filling in codec identity and
    /// coded resolution.
    fn init_ivf(&mut self) -> DemuxResult<()> {
        let got = self
            .cache
            .refill_exact(&mut self.source, ivf::FILE_HEADER_SIZE)
            .map_err(DemuxError::Io)?;
        if got < ivf::FILE_HEADER_SIZE {
            return Err(DemuxError::InvalidHeader {
                reason: format!(
                    "IVF file header truncated ({got} of {} bytes)",
                    ivf::FILE_HEADER_SIZE
                ),
            });
        }
        let header = ivf::parse_file_header(self.cache.range(0, ivf::FILE_HEADER_SIZE))?;
        self.info.codec = header.codec;
        self.info.resolution = Some(header.resolution);
        Ok(())
    }

    /// Prime the cache and position the cursor on the first sync word.
    fn init_sync(&mut self) -> DemuxResult<()> {
        self.cache.ensure_lookahead(&mut self.source);
        if let Framing::Sync(scanner) = &mut self.framing {
            let start = self.cache.read_offset();
            if let Some(first) = scanner.find_sync(self.cache.window(), start) {
                self.cache.seek_to(first);
                return Ok(());
            }
        }
        Err(DemuxError::InvalidHeader {
            reason: "no sync word found in stream".into(),
        })
    }
}
