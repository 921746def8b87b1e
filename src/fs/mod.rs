//! Filesystem port.
//!
//! Every filesystem access made by the engine goes through [`FileSystem`],
//! a thin wrapper around an injected [`Driver`].  Production code plugs in
//! [`OsDriver`]; tests use the in-memory `SpyDriver` or a `mockall`
//! generated `MockDriver`.
//!
//! A [`FileSystem`] built without a driver (see [`FileSystem::default`])
//! is still a valid value, but every operation fails with
//! [`FsError::NoDriver`].

mod os;
#[cfg(test)]
pub mod spy;

pub use os::OsDriver;

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::FsError;

/// Type of an entry as reported by [`Driver::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// A regular file.
    Regular,
    /// A directory.
    Directory,
    /// A symbolic link, with the path it points to as stored in the link.
    Symlink {
        /// Raw link target (not canonicalized).
        target: PathBuf,
    },
}

/// Metadata for an existing filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Entry type.
    pub kind: FileKind,
}

impl FileInfo {
    /// Metadata for a regular file.
    #[must_use]
    pub const fn regular() -> Self {
        Self {
            kind: FileKind::Regular,
        }
    }

    /// Metadata for a directory.
    #[must_use]
    pub const fn directory() -> Self {
        Self {
            kind: FileKind::Directory,
        }
    }

    /// Metadata for a symbolic link pointing at `target`.
    #[must_use]
    pub fn symlink(target: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileKind::Symlink {
                target: target.into(),
            },
        }
    }

    /// Returns `true` for directories (symlinks to directories excluded).
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, FileKind::Directory)
    }
}

/// Raw filesystem capability.
///
/// Drivers report failures as plain [`io::Error`]s; [`FileSystem`] attaches
/// the operation name and path.
#[cfg_attr(test, mockall::automock)]
pub trait Driver {
    /// Create `path` and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if any component cannot be created or exists as a
    /// non-directory.
    fn mkdir_all(&self, path: &Path) -> io::Result<()>;

    /// List the names of the entries inside `path`, as stored on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Read the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Describe the entry at `path` without following a final symlink.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn stat(&self, path: &Path) -> io::Result<Option<FileInfo>>;

    /// Create `link` as a symbolic link pointing at `original`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created (existing entry,
    /// missing parent, permissions).
    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()>;

    /// Write `contents` to `path` with permission bits `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;
}

/// Filesystem handle passed explicitly to the parser, linker and commands.
#[derive(Default)]
pub struct FileSystem {
    driver: Option<Box<dyn Driver>>,
}

impl fmt::Debug for FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSystem")
            .field("driver", &self.driver.as_ref().map(|_| "<dyn Driver>"))
            .finish()
    }
}

impl FileSystem {
    /// Wrap `driver`.
    #[must_use]
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Some(Box::new(driver)),
        }
    }

    /// Filesystem backed by the real operating system.
    #[must_use]
    pub fn os() -> Self {
        Self::new(OsDriver)
    }

    fn driver(&self) -> Result<&dyn Driver, FsError> {
        self.driver.as_deref().ok_or(FsError::NoDriver)
    }

    /// Create `path` and every missing parent.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoDriver`] without a driver, or [`FsError::Io`].
    pub fn mkdir_all(&self, path: &Path) -> Result<(), FsError> {
        self.driver()?
            .mkdir_all(path)
            .map_err(|source| FsError::io("mkdir", path, source))
    }

    /// List the entry names of the directory at `path`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoDriver`] without a driver, or [`FsError::Io`].
    pub fn read_dir(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
        let mut names = self
            .driver()?
            .read_dir(path)
            .map_err(|source| FsError::io("read directory", path, source))?;
        names.sort();
        Ok(names)
    }

    /// Read the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoDriver`] without a driver, or [`FsError::Io`].
    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        self.driver()?
            .read_file(path)
            .map_err(|source| FsError::io("read", path, source))
    }

    /// Describe the entry at `path`; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoDriver`] without a driver, or [`FsError::Io`].
    pub fn stat(&self, path: &Path) -> Result<Option<FileInfo>, FsError> {
        self.driver()?
            .stat(path)
            .map_err(|source| FsError::io("stat", path, source))
    }

    /// Create `link` pointing at `original`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoDriver`] without a driver, or [`FsError::Io`].
    pub fn symlink(&self, original: &Path, link: &Path) -> Result<(), FsError> {
        self.driver()?
            .symlink(original, link)
            .map_err(|source| FsError::io("symlink", link, source))
    }

    /// Write `contents` to `path` with permission bits `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NoDriver`] without a driver, or [`FsError::Io`].
    pub fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> Result<(), FsError> {
        self.driver()?
            .write_file(path, contents, mode)
            .map_err(|source| FsError::io("write", path, source))
    }
}
