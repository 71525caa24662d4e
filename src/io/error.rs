//! Error taxonomy for pool creation and per-file compression sessions.
//!
//! Every failure carries an [`ErrorKind`] naming the stage that failed and a
//! detail string holding the underlying I/O or engine description.  Only
//! [`ErrorKind::ResourceExhausted`] is fatal to a whole batch; every other
//! kind is scoped to the file being processed.

use std::fmt;
use std::io;

use crate::engine::EngineError;

/// Stage at which a compression session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Buffers or engine handle could not be allocated.
    ResourceExhausted,
    /// Source or destination could not be opened.
    IoOpenFailed,
    /// Reading the source failed.
    IoReadFailed,
    /// Writing or flushing the destination failed.
    IoWriteFailed,
    /// The engine refused to start a new frame.
    EngineInitFailed,
    /// A streaming compress step failed or stalled.
    CompressStepFailed,
    /// The engine failed while closing the frame.
    EndFrameFailed,
    /// The engine stopped flushing with data still pending.
    IncompleteFlush,
}

impl ErrorKind {
    /// Short stage label used in user-facing messages.
    pub fn stage(self) -> &'static str {
        match self {
            ErrorKind::ResourceExhausted => "allocation",
            ErrorKind::IoOpenFailed => "open",
            ErrorKind::IoReadFailed => "read",
            ErrorKind::IoWriteFailed => "write",
            ErrorKind::EngineInitFailed => "frame init",
            ErrorKind::CompressStepFailed => "compression",
            ErrorKind::EndFrameFailed => "end of frame",
            ErrorKind::IncompleteFlush => "flush",
        }
    }

    /// `true` when the failure leaves no usable pool for the rest of a batch.
    pub fn is_batch_fatal(self) -> bool {
        self == ErrorKind::ResourceExhausted
    }
}

/// A failed pool creation or compression session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    kind: ErrorKind,
    detail: String,
}

impl SessionError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        SessionError {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Underlying I/O or engine description.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub(crate) fn io(kind: ErrorKind, what: &str, e: &io::Error) -> Self {
        SessionError::new(kind, format!("{}: {}", what, e))
    }

    pub(crate) fn engine(kind: ErrorKind, e: &EngineError) -> Self {
        SessionError::new(kind, e.message())
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind.stage(), self.detail)
    }
}

impl std::error::Error for SessionError {}
