//! Domain-specific error types for the linking engine.
//!
//! Each layer returns its own [`thiserror`] enum; command handlers at the
//! CLI boundary convert them to [`anyhow::Error`] via the standard `?`
//! operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotlinkError
//! ├── Config(ConfigError) — UTF-8 and TOML syntax errors
//! ├── Parse(ParseError)   — variables, names, paths, duplicate targets
//! ├── Fs(FsError)         — missing driver, I/O failures
//! └── Link(LinkError)
//!     ├── Conflicts(ConflictError) — every conflicting path, aggregated
//!     └── Fs(FsError)              — fatal, aborts the walk
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error type for the engine.
#[derive(Error, Debug)]
pub enum DotlinkError {
    /// The configuration document could not be decoded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration could not be turned into a link tree.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A filesystem operation failed outside of linking.
    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),

    /// Linking failed.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),
}

/// Errors raised while decoding a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file is not valid UTF-8.
    #[error("{file} is not valid UTF-8: {source}")]
    Utf8 {
        /// File the bytes were read from.
        file: String,
        /// Underlying decoding error.
        source: std::str::Utf8Error,
    },

    /// The file is not valid TOML or does not match the expected schema.
    #[error("Invalid TOML in {file}: {message}")]
    Syntax {
        /// File the document was read from.
        file: String,
        /// Message reported by the TOML decoder.
        message: String,
    },
}

/// Errors raised while resolving a configuration into a link tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A `$VAR` or `${VAR}` reference names an unset variable.
    #[error("undefined variable '{var}' in '{value}'")]
    UndefinedVariable {
        /// Variable name.
        var: String,
        /// String containing the reference.
        value: String,
    },

    /// A path string cannot be interpreted.
    #[error("malformed path '{value}': {reason}")]
    MalformedPath {
        /// Offending string.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An entry name is empty, absolute, or walks out of its parent.
    #[error("invalid entry name '{0}': must be a relative path without '.' or '..'")]
    InvalidName(String),

    /// Two entries resolve to the same target path.
    #[error("'{first}' and '{second}' both link to {}", .target.display())]
    DuplicateTarget {
        /// Shared target path.
        target: PathBuf,
        /// Entry that claimed the target first.
        first: String,
        /// Entry that collided with it.
        second: String,
    },

    /// The base directory or working directory is not absolute.
    #[error("{what} must be an absolute path, got {}", .path.display())]
    RelativeBase {
        /// Which option was relative (`base directory` or `working directory`).
        what: &'static str,
        /// The relative path.
        path: PathBuf,
    },

    /// `flatten` was set on an entry without children.
    #[error("entry '{0}' sets flatten but has no links")]
    FlattenLeaf(String),
}

/// Errors raised by the filesystem port.
#[derive(Error, Debug)]
pub enum FsError {
    /// The [`FileSystem`](crate::fs::FileSystem) was built without a driver.
    #[error("no filesystem driver configured")]
    NoDriver,

    /// The driver reported an I/O failure.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        /// Operation that failed (`stat`, `mkdir`, …).
        op: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl FsError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Why a target path conflicts with the requested link.
#[derive(Error, Debug)]
pub enum ConflictReason {
    /// A regular file or directory sits where a link should go.
    #[error("file exists and is not a symlink")]
    NotSymlink,

    /// A symlink exists but points somewhere else.
    #[error("symlink points to {}", .current.display())]
    WrongTarget {
        /// Where the existing link points.
        current: PathBuf,
    },

    /// A group target exists but is not a directory.
    #[error("file exists and is not a directory")]
    NotDirectory,

    /// The filesystem refused to create the link.
    #[error("cannot create symlink: {source}")]
    LinkFailed {
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// A single conflicting target path.
#[derive(Error, Debug)]
#[error("{}: {reason}", .path.display())]
pub struct Conflict {
    /// Target path of the conflicting node.
    pub path: PathBuf,
    /// Why linking was refused.
    pub reason: ConflictReason,
}

/// Every conflict found during one link walk, in encounter order.
#[derive(Debug, Default)]
pub struct ConflictError {
    /// Individual conflicts.
    pub errs: Vec<Conflict>,
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errs.as_slice() {
            [only] => write!(f, "1 conflict: {only}"),
            errs => write!(f, "{} conflicts", errs.len()),
        }
    }
}

impl std::error::Error for ConflictError {}

/// Errors returned by [`Linker::link`](crate::linker::Linker::link).
#[derive(Error, Debug)]
pub enum LinkError {
    /// One or more nodes conflicted; all other nodes were processed.
    #[error(transparent)]
    Conflicts(ConflictError),

    /// An unrecoverable filesystem failure aborted the walk.
    #[error(transparent)]
    Fs(#[from] FsError),
}
