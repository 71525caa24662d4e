//! File-level compression: one file per frame, many files per pool.
//!
//! [`compress_multiple_filenames`] is the batch entry point.  It creates one
//! [`ResourcePool`] for the whole batch, runs [`compress_stream`] once per
//! file and destroys the pool after the last file.  [`compress_filename`]
//! does the same for a single file.
//!
//! Post-processing that only makes sense for files lives here rather than in
//! the driver: copying the source's metadata onto the destination, removing
//! the source, and discarding a destination whose frame failed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::displaylevel;
use crate::engine::{Backend, StreamEngine};
use crate::io::compress_stream::{compress_stream, CompressStats};
use crate::io::error::{ErrorKind, SessionError};
use crate::io::file_io::{open_dst_file, open_src_file};
use crate::io::prefs::{cpu_clock, display_level, final_time_display, FailurePolicy, PartialOutput, Prefs};
use crate::io::resources::ResourcePool;
use crate::timefn::get_time;
use crate::util::copy_file_stat;

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files whose frame was completed.
    pub compressed: usize,
    /// Files that failed, in processing order.
    pub failures: Vec<(PathBuf, SessionError)>,
    /// `true` when [`FailurePolicy::Abort`] stopped the batch early.
    pub aborted: bool,
    /// Files never attempted because the batch was aborted.
    pub skipped: usize,
    /// Source bytes of the completed files.
    pub bytes_in: u64,
    /// Compressed bytes of the completed files.
    pub bytes_out: u64,
}

impl BatchReport {
    /// `true` when every file of the batch was compressed.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0
    }

    /// Number of input files that did not produce a frame.
    pub fn missed_files(&self) -> usize {
        self.failures.len() + self.skipped
    }
}

/// `src` with `suffix` appended to its file name.
pub fn dst_file_name(src: &Path, suffix: &str) -> PathBuf {
    let mut name = src.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// compress_filename_ext: one file with a caller-provided pool
// ---------------------------------------------------------------------------

/// Compresses `src` into `dst` as one frame, reusing `pool`.
///
/// On failure after the destination was created, the destination is removed
/// unless `prefs.partial_output` is [`PartialOutput::Keep`].  A destination
/// that already existed and was not opened is never touched.
pub fn compress_filename_ext<H: StreamEngine>(
    pool: &mut ResourcePool<H>,
    src: &Path,
    dst: &Path,
    compression_level: i32,
    prefs: &Prefs,
) -> Result<CompressStats, SessionError> {
    if src == dst {
        return Err(SessionError::new(
            ErrorKind::IoOpenFailed,
            format!("{}: source and destination are the same file", src.display()),
        ));
    }

    let mut reader = open_src_file(src).map_err(|e| {
        SessionError::io(ErrorKind::IoOpenFailed, &src.display().to_string(), &e)
    })?;
    let mut writer = open_dst_file(dst, prefs).map_err(|e| {
        SessionError::io(ErrorKind::IoOpenFailed, &dst.display().to_string(), &e)
    })?;

    let result = compress_stream(pool, &mut reader, &mut writer, compression_level);
    drop(writer);
    drop(reader);

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            discard_partial_output(dst, prefs.partial_output);
            return Err(e);
        }
    };

    if prefs.preserve_file_stat {
        if let Err(e) = copy_file_stat(src, dst) {
            display_level(
                3,
                &format!("Warning : cannot copy file attributes to {}: {} \n", dst.display(), e),
            );
        }
    }

    if prefs.remove_src_file {
        fs::remove_file(src).map_err(|e| {
            SessionError::io(
                ErrorKind::IoWriteFailed,
                &format!("cannot remove {}", src.display()),
                &e,
            )
        })?;
    }

    displaylevel!(
        2,
        "{:<20} :{:6.2}%   ({} => {} bytes, {}) \n",
        src.display(),
        stats.ratio_percent(),
        stats.bytes_in,
        stats.bytes_out,
        dst.display()
    );
    Ok(stats)
}

fn discard_partial_output(dst: &Path, policy: PartialOutput) {
    match policy {
        PartialOutput::Keep => {
            display_level(2, &format!("{}: incomplete frame kept \n", dst.display()));
        }
        PartialOutput::Remove => {
            if let Err(e) = fs::remove_file(dst) {
                display_level(
                    1,
                    &format!("zbatch: cannot remove incomplete {}: {} \n", dst.display(), e),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// compress_filename
// ---------------------------------------------------------------------------

/// Compresses a single file with a pool of its own.
pub fn compress_filename<B: Backend>(
    backend: &B,
    src: &Path,
    dst: &Path,
    compression_level: i32,
    prefs: &Prefs,
) -> Result<CompressStats, SessionError> {
    let time_start = get_time();
    let cpu_start = cpu_clock();
    let mut pool = ResourcePool::from_prefs(backend, prefs)?;

    let result = compress_filename_ext(&mut pool, src, dst, compression_level, prefs);

    pool.destroy();
    let processed = result.as_ref().map(|s| s.bytes_in).unwrap_or(0);
    final_time_display(time_start, cpu_start, processed);
    result
}

// ---------------------------------------------------------------------------
// compress_multiple_filenames
// ---------------------------------------------------------------------------

/// Compresses every file of `srcs` into `src + suffix`, one frame each, with a
/// single [`ResourcePool`].
///
/// Returns `Err` only when the pool cannot be created; per-file failures are
/// collected in the [`BatchReport`] and handled per `prefs.failure_policy`.
pub fn compress_multiple_filenames<B, P>(
    backend: &B,
    srcs: &[P],
    suffix: &str,
    compression_level: i32,
    prefs: &Prefs,
) -> Result<BatchReport, SessionError>
where
    B: Backend,
    P: AsRef<Path>,
{
    let time_start = get_time();
    let cpu_start = cpu_clock();
    let mut pool = ResourcePool::from_prefs(backend, prefs)?;
    let mut report = BatchReport::default();

    for (i, src) in srcs.iter().enumerate() {
        let src = src.as_ref();
        let dst = dst_file_name(src, suffix);

        match compress_filename_ext(&mut pool, src, &dst, compression_level, prefs) {
            Ok(stats) => {
                report.compressed += 1;
                report.bytes_in += stats.bytes_in;
                report.bytes_out += stats.bytes_out;
            }
            Err(e) => {
                displaylevel!(1, "zbatch: {}: {} \n", src.display(), e);
                report.failures.push((src.to_path_buf(), e));
                if prefs.failure_policy == FailurePolicy::Abort {
                    report.aborted = true;
                    report.skipped = srcs.len() - i - 1;
                    break;
                }
            }
        }
    }

    pool.destroy();
    final_time_display(time_start, cpu_start, report.bytes_in);
    Ok(report)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
