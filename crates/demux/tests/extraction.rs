//! End-to-end extraction tests over synthetic elementary streams.
//!
//! Each test builds a complete stream in memory (or on disk for the
//! extension-dispatch test), drives it through `AccessUnitExtractor`, and
//! checks the emitted unit sequence against the framing rules of the
//! respective format.

use std::cell::Cell;
use std::io::{Cursor, Read, Write};
use std::rc::Rc;

use es_common::{Codec, DemuxConfig, DemuxError, Resolution, StreamFormat};
use es_demux::AccessUnitExtractor;

// ---------------------------------------------------------------------------
// Helpers: synthetic stream builders
// ---------------------------------------------------------------------------

const START_CODE: [u8; 3] = [0x00, 0x00, 0x01];

/// Concatenate start-code-prefixed NAL payloads into an Annex-B stream.
fn annexb_stream(payloads: &[&[u8]]) -> Vec<u8> {
    let mut data = Vec::new();
    for payload in payloads {
        data.extend_from_slice(&START_CODE);
        data.extend_from_slice(payload);
    }
    data
}

/// Build an IVF stream: 32-byte file header plus one 12-byte record header
/// per frame (timestamp = frame index).
fn ivf_stream(fourcc: &[u8; 4], width: u16, height: u16, frames: &[&[u8]]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"DKIF");
    data.extend_from_slice(&[0, 0]); // version
    data.extend_from_slice(&[32, 0]); // header size
    data.extend_from_slice(fourcc);
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&[0u8; 16]); // rate, scale, frame count, unused
    for (index, frame) in frames.iter().enumerate() {
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        data.extend_from_slice(&(index as u64).to_le_bytes());
        data.extend_from_slice(frame);
    }
    data
}

/// Build one JPEG picture: SOI, optionally an APP1 segment embedding a
/// complete thumbnail JPEG, some scan data, EOI.
fn jpeg_picture(with_thumbnail: bool, fill: u8) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    if with_thumbnail {
        let thumb = [0xFF, 0xD8, 0x33, 0xFF, 0xD9];
        let length = (2 + thumb.len()) as u16;
        data.extend_from_slice(&[0xFF, 0xE1]);
        data.extend_from_slice(&length.to_be_bytes());
        data.extend_from_slice(&thumb);
    }
    data.extend_from_slice(&[fill; 16]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// A source that counts how many read calls reach it.
struct CountingReader<R> {
    inner: R,
    reads: Rc<Cell<usize>>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read(buf)
    }
}

/// Drain the extractor, collecting owned copies of every unit.
fn collect_units<R: Read>(extractor: &mut AccessUnitExtractor<R>) -> Vec<Vec<u8>> {
    let mut units = Vec::new();
    while let Some(unit) = extractor.next_unit().unwrap() {
        units.push(unit.data.to_vec());
    }
    units
}

// ===========================================================================
// Annex-B framing
// ===========================================================================

#[test]
fn annexb_round_trip() {
    let payloads: Vec<Vec<u8>> = vec![
        vec![0x67, 0x42, 0x00],
        vec![0x68, 0xCE],
        vec![0x65; 600],
        vec![0x41; 40],
        vec![0x41],
    ];
    let payload_refs: Vec<&[u8]> = payloads.iter().map(|p| p.as_slice()).collect();
    let stream = annexb_stream(&payload_refs);

    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(stream.clone()), StreamFormat::H264).unwrap();
    assert_eq!(extractor.info().codec, Codec::H264);

    let units = collect_units(&mut extractor);
    assert_eq!(units.len(), payloads.len());

    // Every unit starts at its original start-code offset and the
    // concatenation reproduces the input byte-for-byte.
    let mut offset = 0;
    for unit in &units {
        assert_eq!(unit.as_slice(), &stream[offset..offset + unit.len()]);
        assert_eq!(&unit[..3], &START_CODE);
        offset += unit.len();
    }
    assert_eq!(offset, stream.len());
    assert!(extractor.is_end_of_stream());
}

#[test]
fn annexb_h265_uses_same_framing() {
    let stream = annexb_stream(&[&[0x40, 0x01], &[0x26, 0x01, 0xAF]]);
    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(stream), StreamFormat::H265).unwrap();
    assert_eq!(extractor.info().codec, Codec::H265);
    assert_eq!(collect_units(&mut extractor).len(), 2);
}

// ===========================================================================
// IVF framing
// ===========================================================================

#[test]
fn ivf_structural_round_trip() {
    let frames: Vec<Vec<u8>> = vec![vec![0x11; 10], Vec::new(), vec![0x22; 5000]];
    let frame_refs: Vec<&[u8]> = frames.iter().map(|f| f.as_slice()).collect();
    let stream = ivf_stream(b"VP80", 64, 48, &frame_refs);

    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(stream), StreamFormat::Ivf).unwrap();
    assert_eq!(extractor.info().codec, Codec::Vp8);
    assert_eq!(extractor.info().resolution, Some(Resolution::new(64, 48)));
    assert!(extractor.info().codec_data.is_empty());

    for (index, frame) in frames.iter().enumerate() {
        let unit = extractor.next_unit().unwrap().unwrap();
        assert_eq!(unit.data.len(), frame.len(), "frame {index}");
        assert_eq!(unit.data, frame.as_slice());
        assert_eq!(unit.timestamp, Some(index as u64));
    }
    assert!(extractor.next_unit().unwrap().is_none());
    assert!(extractor.is_end_of_stream());
}

#[test]
fn ivf_concrete_two_frame_scenario() {
    let stream = ivf_stream(b"VP80", 64, 48, &[&[0xAA, 0xBB, 0xCC, 0xDD], &[]]);
    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(stream), StreamFormat::Ivf).unwrap();

    let unit = extractor.next_unit().unwrap().unwrap();
    assert_eq!(unit.data, &[0xAA, 0xBB, 0xCC, 0xDD]);

    // A zero-size frame is a valid (empty) unit, not end-of-stream.
    let unit = extractor.next_unit().unwrap().unwrap();
    assert!(unit.data.is_empty());
    assert!(!extractor.is_end_of_stream());

    assert!(extractor.next_unit().unwrap().is_none());
    assert!(extractor.is_end_of_stream());
}

#[test]
fn ivf_truncated_payload_is_corruption() {
    let mut stream = ivf_stream(b"VP90", 64, 48, &[&[0x55; 10]]);
    stream.truncate(stream.len() - 4); // deliver only 6 of 10 payload bytes

    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(stream), StreamFormat::Ivf).unwrap();
    assert!(matches!(
        extractor.next_unit(),
        Err(DemuxError::TruncatedData {
            expected: 10,
            got: 6
        })
    ));
}

#[test]
fn ivf_oversized_frame_is_rejected() {
    let mut stream = ivf_stream(b"VP80", 64, 48, &[]);
    // Record header declaring a 100000-byte payload against an 8 KiB cache.
    stream.extend_from_slice(&100_000u32.to_le_bytes());
    stream.extend_from_slice(&0u64.to_le_bytes());

    let mut extractor = AccessUnitExtractor::with_config(
        Cursor::new(stream),
        StreamFormat::Ivf,
        DemuxConfig::new(1024),
    )
    .unwrap();
    assert!(matches!(
        extractor.next_unit(),
        Err(DemuxError::FrameTooLarge {
            size: 100_000,
            ..
        })
    ));
}

// ===========================================================================
// Motion-JPEG framing
// ===========================================================================

#[test]
fn jpeg_nested_thumbnail_is_one_unit() {
    let picture = jpeg_picture(true, 0x10);
    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(picture.clone()), StreamFormat::Mjpeg).unwrap();
    assert_eq!(extractor.info().codec, Codec::Jpeg);

    let units = collect_units(&mut extractor);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0], picture);
}

#[test]
fn jpeg_stream_splits_at_picture_starts() {
    let pictures = [
        jpeg_picture(true, 0x10),
        jpeg_picture(false, 0x20),
        jpeg_picture(false, 0x30),
    ];
    let stream: Vec<u8> = pictures.concat();

    let mut extractor =
        AccessUnitExtractor::new(Cursor::new(stream), StreamFormat::Mjpeg).unwrap();
    let units = collect_units(&mut extractor);

    assert_eq!(units.len(), 3);
    for (unit, picture) in units.iter().zip(pictures.iter()) {
        assert_eq!(unit, picture);
    }
}

// ===========================================================================
// Shared extraction properties
// ===========================================================================

#[test]
fn memory_stays_bounded_on_long_streams() {
    // ~78 KiB of input against an 8 KiB cache: many refill/compact cycles.
    let payload = vec![0x41u8; 256];
    let payloads: Vec<&[u8]> = (0..300).map(|_| payload.as_slice()).collect();
    let stream = annexb_stream(&payloads);

    let config = DemuxConfig::new(1024);
    let mut extractor =
        AccessUnitExtractor::with_config(Cursor::new(stream.clone()), StreamFormat::H264, config)
            .unwrap();
    assert_eq!(extractor.cache_capacity(), config.cache_capacity());

    let units = collect_units(&mut extractor);
    assert_eq!(units.len(), 300);
    assert_eq!(units.iter().map(Vec::len).sum::<usize>(), stream.len());
    // The cache never grew past its construction-time capacity.
    assert_eq!(extractor.cache_capacity(), config.cache_capacity());
}

#[test]
fn eos_is_idempotent_and_stops_reading() {
    let reads = Rc::new(Cell::new(0));
    let source = CountingReader {
        inner: Cursor::new(annexb_stream(&[&[0x67], &[0x68]])),
        reads: Rc::clone(&reads),
    };

    let mut extractor = AccessUnitExtractor::with_config(
        source,
        StreamFormat::H264,
        DemuxConfig::new(1024),
    )
    .unwrap();
    while extractor.next_unit().unwrap().is_some() {}
    assert!(extractor.is_end_of_stream());

    let reads_at_eos = reads.get();
    for _ in 0..3 {
        assert!(extractor.next_unit().unwrap().is_none());
    }
    assert_eq!(reads.get(), reads_at_eos);
}

// ===========================================================================
// File-based open (extension dispatch)
// ===========================================================================

#[test]
fn open_dispatches_by_extension() {
    let mut file = tempfile::Builder::new()
        .suffix(".ivf")
        .tempfile()
        .unwrap();
    file.write_all(&ivf_stream(b"VP80", 64, 48, &[&[0xAB; 10]]))
        .unwrap();
    file.flush().unwrap();

    let mut extractor = AccessUnitExtractor::open(file.path()).unwrap();
    assert_eq!(extractor.info().codec, Codec::Vp8);
    let unit = extractor.next_unit().unwrap().unwrap();
    assert_eq!(unit.data.len(), 10);
    assert!(extractor.next_unit().unwrap().is_none());
}

#[test]
fn open_rejects_unknown_extension_before_touching_the_file() {
    let result = AccessUnitExtractor::open(std::path::Path::new("missing.avi"));
    assert!(matches!(
        result,
        Err(DemuxError::UnsupportedFormat { .. })
    ));
}
