//! File status helpers.
//!
//! Metadata is read through `std::fs::Metadata`; timestamps are written with
//! the `filetime` crate and ownership with `nix` (POSIX only).

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use filetime::FileTime;

/// Sets modification time, ownership (POSIX) and permission bits on a
/// regular file.
///
/// Returns `Err` if `path` is not a regular file, or the first error raised
/// while setting the time or the permissions.  Ownership is best effort: an
/// unprivileged caller usually cannot give a file away, and the mode is
/// applied either way.  `mode` is applied as `mode & 0o7777`.
pub fn set_file_stat(path: &Path, mtime: SystemTime, uid: u32, gid: u32, mode: u32) -> io::Result<()> {
    if !is_reg_file(path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: not a regular file", path.display()),
        ));
    }

    let atime = FileTime::from_system_time(SystemTime::now());
    filetime::set_file_times(path, atime, FileTime::from_system_time(mtime))?;

    #[cfg(unix)]
    {
        use nix::unistd::{chown, Gid, Uid};
        use std::os::unix::fs::PermissionsExt;
        // Ignored: a failed chown must not leave the default permissions.
        let _ = chown(path, Some(Uid::from_raw(uid)), Some(Gid::from_raw(gid)));
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (uid, gid);
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(mode & 0o200 == 0);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Copies the modification time, ownership and permissions of `src` onto
/// `dst`.
pub fn copy_file_stat(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = fs::metadata(src)?;
    let mtime = meta.modified()?;

    #[cfg(unix)]
    let (uid, gid, mode) = {
        use std::os::unix::fs::MetadataExt;
        (meta.uid(), meta.gid(), meta.mode())
    };
    #[cfg(not(unix))]
    let (uid, gid, mode) = (0, 0, if meta.permissions().readonly() { 0o444 } else { 0o644 });

    set_file_stat(dst, mtime, uid, gid, mode)
}

/// Returns `true` if `path` refers to a regular file (symlinks followed).
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.file_type().is_file()).unwrap_or(false)
}

/// Returns `true` if `path` refers to a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.file_type().is_dir()).unwrap_or(false)
}
