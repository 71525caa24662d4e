//! Opening of source and destination files for one compression session.
//!
//! - [`open_src_file`] rejects directories and returns a buffered reader.
//! - [`open_dst_file`] enforces the overwrite policy from [`Prefs`] and
//!   never prompts: an existing destination without `overwrite` is an error.
//!
//! Both return `io::Result`; the file layer maps failures to
//! [`ErrorKind::IoOpenFailed`](crate::io::error::ErrorKind::IoOpenFailed).

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use crate::io::prefs::{display_level, Prefs};
use crate::util::is_directory;

/// Opens `path` for reading.
pub fn open_src_file(path: &Path) -> io::Result<BufReader<File>> {
    if is_directory(path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is a directory -- ignored", path.display()),
        ));
    }
    let f = File::open(path)?;
    Ok(BufReader::new(f))
}

/// Creates or truncates `path` for writing.
///
/// Fails with [`io::ErrorKind::AlreadyExists`] when the file exists and
/// `prefs.overwrite` is off.
pub fn open_dst_file(path: &Path, prefs: &Prefs) -> io::Result<BufWriter<File>> {
    let mut options = OpenOptions::new();
    options.write(true);
    if prefs.overwrite {
        if path.exists() {
            display_level(4, &format!("{} exists, overwriting \n", path.display()));
        }
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let f = options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists; not overwritten", path.display()),
            )
        } else {
            e
        }
    })?;
    Ok(BufWriter::new(f))
}
