//! [`Driver`] backed by [`std::fs`].
use std::ffi::OsString;
use std::io;
use std::path::Path;

use super::{Driver, FileInfo};

/// Production driver delegating to the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsDriver;

impl Driver for OsDriver {
    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn stat(&self, path: &Path) -> io::Result<Option<FileInfo>> {
        let meta = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let info = if meta.file_type().is_symlink() {
            FileInfo::symlink(std::fs::read_link(path)?)
        } else if meta.is_dir() {
            FileInfo::directory()
        } else {
            FileInfo::regular()
        };
        Ok(Some(info))
    }

    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()> {
        create_symlink(original, link)
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        std::fs::write(path, contents)?;
        set_mode(path, mode)
    }
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

/// Directory links need `symlink_dir` on Windows; the source type decides.
#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    if original.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
