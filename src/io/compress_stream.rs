//! The streaming compression driver.
//!
//! [`compress_stream`] turns one byte source into one complete frame written
//! to one byte sink, using only the buffers and engine handle held by a
//! [`ResourcePool`].  It is independent of files: anything implementing
//! [`Read`] / [`Write`] can be driven, which is what the file layer in
//! `io::compress_file` and the tests rely on.
//!
//! # Protocol
//!
//! A frame walks through [`FrameState`] in order:
//!
//! ```text
//! Uninitialized → Initialized → Streaming → Finalizing → Closed
//! ```
//!
//! - **Initialized**: the pooled engine is reset for a new frame.
//! - **Streaming**: chunks are read into the input buffer, sized by the
//!   engine's hint (see [`ChunkPlanner`]).  Each chunk is fed to the engine
//!   until fully consumed; every step gets the whole output buffer, and
//!   whatever the step produced is written out before the next step.
//! - **Finalizing**: the engine is asked to close the frame until it reports
//!   nothing left to flush.
//! - **Closed**: reached on success and on every failure.
//!
//! The driver never deletes or rewrites output; a failed frame leaves a
//! truncated destination for the caller to deal with.

use std::io::{self, Read, Write};

use crate::engine::{InCursor, OutCursor, StreamEngine};
use crate::io::chunk::ChunkPlanner;
use crate::io::error::{ErrorKind, SessionError};
use crate::io::resources::ResourcePool;

/// End-of-frame rounds tolerated while the engine's pending count does not
/// drop below its lowest value so far.
const MAX_FLUSH_ROUNDS_WITHOUT_PROGRESS: u32 = 4;

// ---------------------------------------------------------------------------
// Public result type
// ---------------------------------------------------------------------------

/// Statistics of one completed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressStats {
    /// Uncompressed source bytes consumed.
    pub bytes_in: u64,
    /// Compressed bytes written to the destination.
    pub bytes_out: u64,
    /// Non-empty chunks read from the source.
    pub chunks: u64,
    /// Engine hints that exceeded the input buffer and were clamped.
    pub clamped_hints: u64,
}

impl CompressStats {
    /// Compressed size as a percentage of the source size.
    pub fn ratio_percent(&self) -> f64 {
        self.bytes_out as f64 / self.bytes_in.max(1) as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Frame state machine
// ---------------------------------------------------------------------------

/// Lifecycle of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Uninitialized,
    Initialized,
    Streaming,
    Finalizing,
    Closed,
}

impl FrameState {
    /// `true` if a frame may move from `self` to `next`.
    ///
    /// Forward moves go one step at a time; any open state may jump to
    /// `Closed` (failure path).
    pub fn can_advance_to(self, next: FrameState) -> bool {
        use FrameState::*;
        matches!(
            (self, next),
            (Uninitialized, Initialized)
                | (Initialized, Streaming)
                | (Streaming, Finalizing)
                | (Uninitialized, Closed)
                | (Initialized, Closed)
                | (Streaming, Closed)
                | (Finalizing, Closed)
        )
    }
}

// ---------------------------------------------------------------------------
// read_to_capacity: fill buf from reader until full or EOF
// ---------------------------------------------------------------------------

/// Reads until `buf` is full or the source is exhausted; returns the number
/// of bytes read.  `0` means end of input.
pub fn read_to_capacity<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// FrameSession
// ---------------------------------------------------------------------------

/// One frame being produced with a borrowed [`ResourcePool`].
///
/// The session enforces the [`FrameState`] order: calling a stage out of
/// order panics.  Any stage that fails moves the session to
/// [`FrameState::Closed`].
pub struct FrameSession<'p, H: StreamEngine> {
    pool: &'p mut ResourcePool<H>,
    state: FrameState,
    planner: ChunkPlanner,
    stats: CompressStats,
}

impl<'p, H: StreamEngine> FrameSession<'p, H> {
    pub fn new(pool: &'p mut ResourcePool<H>) -> Self {
        let planner = ChunkPlanner::new(pool.input_capacity());
        FrameSession {
            pool,
            state: FrameState::Uninitialized,
            planner,
            stats: CompressStats::default(),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> CompressStats {
        self.stats
    }

    fn advance(&mut self, next: FrameState) {
        assert!(
            self.state.can_advance_to(next),
            "illegal frame transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Closes the session if `result` is an error.
    fn close_on_err<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if result.is_err() {
            self.state = FrameState::Closed;
        }
        result
    }

    /// Resets the pooled engine for a new frame at `level`.
    ///
    /// # Panics
    /// If the session is not [`FrameState::Uninitialized`].
    pub fn begin(&mut self, level: i32) -> Result<(), SessionError> {
        self.advance(FrameState::Initialized);
        let result = self.pool.begin_frame(level);
        self.close_on_err(result)
    }

    /// Streams `src` through the engine until end of input, writing every
    /// produced byte to `dst`.
    ///
    /// # Panics
    /// If the session is not [`FrameState::Initialized`].
    pub fn pump<R, W>(&mut self, src: &mut R, dst: &mut W) -> Result<(), SessionError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.advance(FrameState::Streaming);
        let result = self.pump_chunks(src, dst);
        self.close_on_err(result)
    }

    fn pump_chunks<R, W>(&mut self, src: &mut R, dst: &mut W) -> Result<(), SessionError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let (src_buffer, dst_buffer, engine) = self.pool.split_mut();

        loop {
            let want = self.planner.next_read_size();
            let read = read_to_capacity(src, &mut src_buffer[..want])
                .map_err(|e| SessionError::io(ErrorKind::IoReadFailed, "cannot read source", &e))?;
            if read == 0 {
                return Ok(());
            }
            self.stats.bytes_in += read as u64;
            self.stats.chunks += 1;

            let mut input = InCursor::new(&src_buffer[..read]);
            while !input.is_consumed() {
                let consumed_before = input.pos();
                let mut output = OutCursor::new(&mut *dst_buffer);
                let hint = engine
                    .compress_step(&mut input, &mut output)
                    .map_err(|e| SessionError::engine(ErrorKind::CompressStepFailed, &e))?;
                if self.planner.apply_hint(hint) {
                    self.stats.clamped_hints += 1;
                }

                let produced = output.written();
                if produced.is_empty() && input.pos() == consumed_before {
                    return Err(SessionError::new(
                        ErrorKind::CompressStepFailed,
                        format!(
                            "engine made no progress with {} input bytes pending",
                            input.size() - input.pos()
                        ),
                    ));
                }
                dst.write_all(produced).map_err(|e| {
                    SessionError::io(ErrorKind::IoWriteFailed, "cannot write compressed data", &e)
                })?;
                self.stats.bytes_out += produced.len() as u64;
            }
        }
    }

    /// Closes the frame, writes the epilogue and flushes `dst`.
    ///
    /// # Panics
    /// If the session is not [`FrameState::Streaming`].
    pub fn finish<W: Write + ?Sized>(&mut self, dst: &mut W) -> Result<CompressStats, SessionError> {
        self.advance(FrameState::Finalizing);
        let result = self.end_frame(dst);
        self.state = FrameState::Closed;
        result.map(|()| self.stats)
    }

    fn end_frame<W: Write + ?Sized>(&mut self, dst: &mut W) -> Result<(), SessionError> {
        let (_, dst_buffer, engine) = self.pool.split_mut();
        let mut least_remaining = usize::MAX;
        let mut rounds_without_progress = 0;

        loop {
            let mut output = OutCursor::new(&mut *dst_buffer);
            let remaining = engine
                .end_frame(&mut output)
                .map_err(|e| SessionError::engine(ErrorKind::EndFrameFailed, &e))?;
            let produced = output.written();
            dst.write_all(produced).map_err(|e| {
                SessionError::io(ErrorKind::IoWriteFailed, "cannot write end of frame", &e)
            })?;
            self.stats.bytes_out += produced.len() as u64;

            if remaining == 0 {
                break;
            }
            if remaining < least_remaining {
                least_remaining = remaining;
                rounds_without_progress = 0;
            } else {
                rounds_without_progress += 1;
            }
            if produced.is_empty() || rounds_without_progress > MAX_FLUSH_ROUNDS_WITHOUT_PROGRESS {
                return Err(SessionError::new(
                    ErrorKind::IncompleteFlush,
                    format!("frame not fully flushed: {} bytes still pending", remaining),
                ));
            }
        }

        dst.flush()
            .map_err(|e| SessionError::io(ErrorKind::IoWriteFailed, "cannot flush destination", &e))
    }
}

// ---------------------------------------------------------------------------
// compress_stream
// ---------------------------------------------------------------------------

/// Compresses everything readable from `src` into one frame written to
/// `dst`, reusing `pool`'s buffers and engine.
pub fn compress_stream<H, R, W>(
    pool: &mut ResourcePool<H>,
    src: &mut R,
    dst: &mut W,
    compression_level: i32,
) -> Result<CompressStats, SessionError>
where
    H: StreamEngine,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut session = FrameSession::new(pool);
    session.begin(compression_level)?;
    session.pump(src, dst)?;
    session.finish(dst)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
