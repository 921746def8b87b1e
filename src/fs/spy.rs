//! In-memory [`Driver`] that records every call.
//!
//! Clones share state, so a test keeps one handle for assertions while the
//! [`FileSystem`](super::FileSystem) owns the other.
#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{Driver, FileInfo};

/// A recorded driver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `mkdir_all(path)`
    MkdirAll(PathBuf),
    /// `read_dir(path)`
    ReadDir(PathBuf),
    /// `read_file(path)`
    ReadFile(PathBuf),
    /// `stat(path)`
    Stat(PathBuf),
    /// `symlink(original, link)`
    Symlink(PathBuf, PathBuf),
    /// `write_file(path, contents, mode)`
    WriteFile(PathBuf, Vec<u8>, u32),
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<PathBuf, FileInfo>,
    contents: BTreeMap<PathBuf, Vec<u8>>,
    failing_symlinks: HashSet<PathBuf>,
    calls: Vec<Call>,
}

/// Recording in-memory filesystem for unit tests.
///
/// Parent directories are not enforced for `symlink` and `write_file`;
/// tests seed exactly the entries they care about.
#[derive(Debug, Default, Clone)]
pub struct SpyDriver {
    state: Arc<Mutex<State>>,
}

impl SpyDriver {
    /// Create an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("spy state poisoned")
    }

    /// Seed a directory at `path`.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.lock().entries.insert(path.into(), FileInfo::directory());
        self
    }

    /// Seed a regular file at `path`.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        let path = path.into();
        {
            let mut state = self.lock();
            state.entries.insert(path.clone(), FileInfo::regular());
            state.contents.insert(path, contents.as_bytes().to_vec());
        }
        self
    }

    /// Seed a symlink at `path` pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.lock()
            .entries
            .insert(path.into(), FileInfo::symlink(target));
        self
    }

    /// Make `symlink` fail with `PermissionDenied` when creating `link`.
    #[must_use]
    pub fn failing_symlink(self, link: impl Into<PathBuf>) -> Self {
        self.lock().failing_symlinks.insert(link.into());
        self
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls that changed the filesystem (`mkdir_all`, `symlink`, `write_file`).
    #[must_use]
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::MkdirAll(_) | Call::Symlink(..) | Call::WriteFile(..)))
            .collect()
    }

    /// Forget recorded calls, keeping filesystem state.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Current entry at `path`, if any.
    #[must_use]
    pub fn entry(&self, path: &Path) -> Option<FileInfo> {
        self.lock().entries.get(path).cloned()
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }
}

impl Driver for SpyDriver {
    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        self.record(Call::MkdirAll(path.to_path_buf()));
        let mut state = self.lock();
        for dir in path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            match state.entries.get(dir).map(FileInfo::is_dir) {
                Some(false) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} exists and is not a directory", dir.display()),
                    ));
                }
                Some(true) => {}
                None => {
                    state.entries.insert(dir.to_path_buf(), FileInfo::directory());
                }
            }
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.record(Call::ReadDir(path.to_path_buf()));
        let state = self.lock();
        match state.entries.get(path) {
            Some(info) if info.is_dir() => Ok(state
                .entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .filter_map(|p| p.file_name())
                .map(ToOwned::to_owned)
                .collect()),
            Some(_) => Err(io::Error::other("not a directory")),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.record(Call::ReadFile(path.to_path_buf()));
        self.lock()
            .contents
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn stat(&self, path: &Path) -> io::Result<Option<FileInfo>> {
        self.record(Call::Stat(path.to_path_buf()));
        Ok(self.lock().entries.get(path).cloned())
    }

    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()> {
        self.record(Call::Symlink(original.to_path_buf(), link.to_path_buf()));
        let mut state = self.lock();
        if state.failing_symlinks.contains(link) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if state.entries.contains_key(link) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        state
            .entries
            .insert(link.to_path_buf(), FileInfo::symlink(original));
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        self.record(Call::WriteFile(path.to_path_buf(), contents.to_vec(), mode));
        let mut state = self.lock();
        state.entries.insert(path.to_path_buf(), FileInfo::regular());
        state.contents.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
