//! Public API surface for batch compression.
//!
//! Sub-modules, bottom-up:
//! - [`prefs`]          : notification level, timing display, [`Prefs`]
//! - [`error`]          : [`SessionError`] and its [`ErrorKind`]s
//! - [`resources`]      : the [`ResourcePool`] shared by a batch
//! - [`chunk`]          : hint-driven read sizing
//! - [`compress_stream`]: the per-frame driver
//! - [`file_io`]        : opening sources and destinations
//! - [`compress_file`]  : single-file and batch entry points

pub mod chunk;
pub mod compress_file;
pub mod compress_stream;
pub mod error;
pub mod file_io;
pub mod prefs;
pub mod resources;

// ── Core types ───────────────────────────────────────────────────────────────
pub use chunk::ChunkPlanner;
pub use error::{ErrorKind, SessionError};
pub use prefs::{FailurePolicy, PartialOutput, Prefs};
pub use resources::ResourcePool;

// ── Notification level ───────────────────────────────────────────────────────
pub use prefs::{notification_level, set_notification_level};

// ── Driver ───────────────────────────────────────────────────────────────────
pub use compress_stream::{compress_stream, CompressStats, FrameSession, FrameState};

// ── Files and batches ────────────────────────────────────────────────────────
pub use compress_file::{
    compress_filename, compress_filename_ext, compress_multiple_filenames, dst_file_name,
    BatchReport,
};
