//! The compression-engine seam.
//!
//! The driver in [`crate::io`] never touches a compression algorithm
//! directly.  It talks to two traits:
//!
//! - [`Backend`]: library-level queries made once, before any file is
//!   processed: the buffer sizes that guarantee forward progress, and handle
//!   creation.
//! - [`StreamEngine`]: the handle itself: start a frame, push input through
//!   it, and close the frame.  Dropping the handle releases it.
//!
//! [`zstd::Zstd`] is the production backend.  Tests plug in their own
//! backends to count handle creations or inject faults.

pub mod cursor;
pub mod zstd;

use std::fmt;

pub use cursor::{InCursor, OutCursor};
pub use self::zstd::{Zstd, ZstdHandle};

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Error reported by an engine operation, carrying the engine's own
/// description of what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError {
            message: message.into(),
        }
    }

    /// The engine's error description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::new(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A streaming compression library.
pub trait Backend {
    /// Handle type produced by [`Backend::create_handle`].
    type Handle: StreamEngine;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Extension (including the leading dot) conventionally given to frames
    /// produced by this backend.
    fn extension(&self) -> &'static str;

    /// Input chunk size that always lets a compress step make progress.
    fn recommended_input_size(&self) -> usize;

    /// Output buffer size that always lets a compress or end-of-frame step
    /// make progress.
    fn recommended_output_size(&self) -> usize;

    /// Creates a new compression handle.
    fn create_handle(&self) -> Result<Self::Handle, EngineError>;
}

/// One streaming compression handle.
///
/// Frame state lives inside the handle; buffers are owned by the caller and
/// lent through cursors for the duration of a single call.
pub trait StreamEngine {
    /// Discards any frame in progress and starts a new, independent frame at
    /// compression `level`.  Allocated memory is kept.
    fn init_frame(&mut self, level: i32) -> Result<(), EngineError>;

    /// Consumes a prefix of `input`'s unread region and produces a prefix of
    /// `output`'s unwritten region, advancing both cursors.
    ///
    /// Returns a hint for the ideal size of the next input chunk.  The hint
    /// may exceed the caller's buffer; `0` means "no preference".
    fn compress_step(
        &mut self,
        input: &mut InCursor<'_>,
        output: &mut OutCursor<'_>,
    ) -> Result<usize, EngineError>;

    /// Flushes buffered data and writes the frame epilogue into `output`.
    ///
    /// Returns the number of bytes still waiting to be flushed; `0` means the
    /// frame is complete and independently decodable.
    fn end_frame(&mut self, output: &mut OutCursor<'_>) -> Result<usize, EngineError>;
}

impl<E: StreamEngine + ?Sized> StreamEngine for Box<E> {
    fn init_frame(&mut self, level: i32) -> Result<(), EngineError> {
        (**self).init_frame(level)
    }

    fn compress_step(
        &mut self,
        input: &mut InCursor<'_>,
        output: &mut OutCursor<'_>,
    ) -> Result<usize, EngineError> {
        (**self).compress_step(input, output)
    }

    fn end_frame(&mut self, output: &mut OutCursor<'_>) -> Result<usize, EngineError> {
        (**self).end_frame(output)
    }
}
