//! Expansion of command-line operands into a flat list of input files.
//!
//! Directories are walked recursively with [`walkdir`], without following
//! symlinks.  Files found inside a directory that already carry the output
//! suffix are skipped, so compressing a tree twice does not produce
//! `x.zst.zst`.  Operands naming a file are passed through untouched.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::io::prefs::display_level;

/// Expands `inputs` into regular files.
///
/// Entries from each directory are returned in file-name order.  An
/// unreadable directory entry aborts the expansion.
pub fn create_file_list(inputs: &[&Path], skip_suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            result.push(input.to_path_buf());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| match e.io_error() {
                Some(io) => io::Error::new(io.kind(), e.to_string()),
                None => io::Error::other(e.to_string()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let has_suffix = !skip_suffix.is_empty()
                && entry.file_name().to_string_lossy().ends_with(skip_suffix);
            if has_suffix {
                display_level(
                    3,
                    &format!("{}: already has {} suffix -- ignored \n", entry.path().display(), skip_suffix),
                );
                continue;
            }
            result.push(entry.into_path());
        }
    }
    Ok(result)
}
