// Integration tests for src/io/compress_stream.rs: the per-frame driver.
//
// Stub engines exercise buffer bounds, hint handling and fault paths; the
// zstd backend checks that real frames round-trip and that reusing a pool
// gives the same bytes as a fresh one.

use std::io::{self, Read, Write};

use zbatch::engine::{Backend, Zstd};
use zbatch::io::{compress_stream, ErrorKind, FrameSession, FrameState, ResourcePool};

use crate::support::{sample_data, toy_decode, Fault, HintPolicy, Toy};

fn toy_compress(toy: &Toy, data: &[u8]) -> Vec<u8> {
    let mut pool = ResourcePool::create(toy).unwrap();
    let mut out = Vec::new();
    let stats = compress_stream(&mut pool, &mut &data[..], &mut out, 5).unwrap();
    assert_eq!(stats.bytes_in, data.len() as u64);
    assert_eq!(stats.bytes_out, out.len() as u64);
    out
}

fn zstd_compress(pool: &mut ResourcePool<zbatch::engine::ZstdHandle>, data: &[u8], level: i32) -> Vec<u8> {
    let mut out = Vec::new();
    compress_stream(pool, &mut &data[..], &mut out, level).unwrap();
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Buffer bounds and hints
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn huge_hints_are_clamped_to_input_buffer() {
    let toy = Toy::new(16, 32).hint(HintPolicy::Huge);
    let data = sample_data(16 * 10 + 3, 1);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let mut out = Vec::new();
    let stats = compress_stream(&mut pool, &mut &data[..], &mut out, 5).unwrap();

    assert!(stats.clamped_hints > 0);
    assert!(toy.counters.largest_chunk.get() <= 16);
    assert_eq!(toy_decode(&out).unwrap(), (5, data));
}

#[test]
fn zero_hint_keeps_reading_full_chunks() {
    let toy = Toy::new(10, 32).hint(HintPolicy::Zero);
    let data = sample_data(95, 2);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let mut out = Vec::new();
    let stats = compress_stream(&mut pool, &mut &data[..], &mut out, 5).unwrap();

    assert_eq!(stats.chunks, 10);
    assert_eq!(stats.clamped_hints, 0);
    assert_eq!(toy_decode(&out).unwrap().1, data);
}

#[test]
fn varying_hints_drive_chunk_sizes() {
    let toy = Toy::new(8, 64).hint(HintPolicy::Growing);
    let data = sample_data(200, 3);
    let out = toy_compress(&toy, &data);
    assert_eq!(toy_decode(&out).unwrap().1, data);
    assert!(toy.counters.largest_chunk.get() <= 8);
}

#[test]
fn partial_consumption_and_tiny_output_buffer() {
    let toy = Toy::new(32, 5).max_consume(3);
    let data = sample_data(1000, 4);
    let out = toy_compress(&toy, &data);
    assert_eq!(toy_decode(&out).unwrap().1, data);
    // Every step takes at most 3 bytes.
    assert!(toy.counters.steps.get() >= 1000 / 3);
}

#[test]
fn end_frame_is_repeated_until_nothing_remains() {
    let toy = Toy::new(16, 64).max_flush(1);
    let data = sample_data(40, 5);
    let out = toy_compress(&toy, &data);
    assert_eq!(toy_decode(&out).unwrap().1, data);
    // The 8-byte trailer leaves one byte per call.
    assert!(toy.counters.end_calls.get() >= 8);
}

#[test]
fn end_frame_through_small_output_buffer() {
    let toy = Toy::new(4, 3);
    let out = toy_compress(&toy, b"");
    assert_eq!(toy_decode(&out).unwrap(), (5, Vec::new()));
    assert_eq!(toy.counters.steps.get(), 0);
    assert!(toy.counters.end_calls.get() >= 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Fault paths
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stuck_flush_is_incomplete_flush() {
    let toy = Toy::new(16, 16).fault(Fault::StuckFlush);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let err = compress_stream(&mut pool, &mut &b"abc"[..], &mut Vec::new(), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteFlush);
    assert!(err.detail().contains('5'), "{}", err);
}

/// Writer that fails once more than `limit` bytes were written.
struct BoundedWriter {
    written: usize,
    limit: usize,
}

impl Write for BoundedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len();
        if self.written > self.limit {
            return Err(io::Error::other("output limit exceeded"));
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn flush_that_never_shrinks_is_incomplete_flush() {
    let toy = Toy::new(16, 16).fault(Fault::TrickleFlush);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let mut dst = BoundedWriter { written: 0, limit: 1 << 20 };

    let err = compress_stream(&mut pool, &mut &b"abc"[..], &mut dst, 1).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompleteFlush);
    assert!(toy.counters.end_calls.get() < 10, "{} rounds", toy.counters.end_calls.get());
    assert!(dst.written < 64);
}

#[test]
fn end_frame_error_is_reported() {
    let toy = Toy::new(16, 16).fault(Fault::EndFails);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let err = compress_stream(&mut pool, &mut &b"abc"[..], &mut Vec::new(), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EndFrameFailed);
    assert!(err.to_string().contains("cannot close frame"));
}

#[test]
fn stalled_engine_is_compress_step_failure() {
    let toy = Toy::new(16, 16).fault(Fault::Stall);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let err = compress_stream(&mut pool, &mut &b"abc"[..], &mut Vec::new(), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CompressStepFailed);
}

#[test]
fn init_failure_is_engine_init_failed() {
    let toy = Toy::new(16, 16).fault(Fault::InitFails);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let err = compress_stream(&mut pool, &mut &b"abc"[..], &mut Vec::new(), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineInitFailed);
}

#[test]
fn step_failure_leaves_pool_usable_for_next_frame() {
    // Step 2 of every frame fails: a long input hits it, a short one does not.
    let toy = Toy::new(4, 64).fault(Fault::StepFails(2));
    let mut pool = ResourcePool::create(&toy).unwrap();

    let err = compress_stream(&mut pool, &mut &sample_data(64, 6)[..], &mut Vec::new(), 1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CompressStepFailed);

    let mut out = Vec::new();
    compress_stream(&mut pool, &mut &b"ok"[..], &mut out, 1).unwrap();
    assert_eq!(toy_decode(&out).unwrap().1, b"ok");
    assert_eq!(toy.counters.created.get(), 1);
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn read_error_is_io_read_failed() {
    let mut pool = ResourcePool::create(&Zstd::new()).unwrap();
    let err = compress_stream(&mut pool, &mut FailingReader, &mut Vec::new(), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoReadFailed);
    assert!(err.detail().contains("disk on fire"));
}

#[test]
fn write_error_is_io_write_failed() {
    let mut pool = ResourcePool::create(&Zstd::new()).unwrap();
    let err = compress_stream(&mut pool, &mut &b"abc"[..], &mut FailingWriter, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoWriteFailed);
}

#[test]
fn failed_session_ends_closed() {
    let toy = Toy::new(16, 16).fault(Fault::Stall);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let mut session = FrameSession::new(&mut pool);
    session.begin(1).unwrap();
    assert!(session.pump(&mut &b"x"[..], &mut Vec::new()).is_err());
    assert_eq!(session.state(), FrameState::Closed);
}

// ─────────────────────────────────────────────────────────────────────────────
// zstd frames
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_gives_valid_empty_frame() {
    let mut pool = ResourcePool::create(&Zstd::new()).unwrap();
    let out = zstd_compress(&mut pool, b"", 7);
    assert!(!out.is_empty());
    assert!(zstd::decode_all(&out[..]).unwrap().is_empty());
}

#[test]
fn single_byte_and_multi_capacity_round_trip() {
    let z = Zstd::new();
    let cap = z.recommended_input_size();
    let mut pool = ResourcePool::create(&z).unwrap();
    for data in [vec![0x42u8], sample_data(cap * 3 + 17, 7)] {
        let out = zstd_compress(&mut pool, &data, 7);
        assert_eq!(zstd::decode_all(&out[..]).unwrap(), data);
    }
}

#[test]
fn pooled_frames_match_fresh_pools() {
    let z = Zstd::new();
    let inputs = [
        sample_data(0, 0),
        sample_data(1, 1),
        sample_data(z.recommended_input_size() * 2 + 5, 2),
        sample_data(5000, 3),
    ];

    let mut shared = ResourcePool::create(&z).unwrap();
    for (i, data) in inputs.iter().enumerate() {
        let level = if i % 2 == 0 { 7 } else { 1 };
        let pooled = zstd_compress(&mut shared, data, level);
        let mut fresh_pool = ResourcePool::create(&z).unwrap();
        let fresh = zstd_compress(&mut fresh_pool, data, level);
        assert_eq!(pooled, fresh, "input {} differs", i);
    }
}

#[test]
fn checksum_frames_round_trip() {
    let mut pool = ResourcePool::create(&Zstd::with_checksum(true)).unwrap();
    let data = sample_data(10_000, 9);
    let out = zstd_compress(&mut pool, &data, 3);
    assert_eq!(zstd::decode_all(&out[..]).unwrap(), data);
}

#[test]
fn small_input_buffer_still_round_trips() {
    let mut pool = ResourcePool::with_input_capacity(&Zstd::new(), 100).unwrap();
    let data = sample_data(20_000, 10);
    let mut out = Vec::new();
    let stats = compress_stream(&mut pool, &mut &data[..], &mut out, 7).unwrap();
    assert!(stats.chunks >= 200);
    assert_eq!(zstd::decode_all(&out[..]).unwrap(), data);
}
