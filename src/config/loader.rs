//! TOML configuration loading.
use std::path::Path;

use super::Config;
use crate::error::{ConfigError, DotlinkError};
use crate::fs::FileSystem;

/// Decode a configuration document.
///
/// `file` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Utf8`] for non UTF-8 input and
/// [`ConfigError::Syntax`] for invalid TOML or unknown fields.
///
/// # Examples
///
/// ```
/// let config = dotlink::config::from_slice(b"[links]\nbashrc = \".bashrc\"\n", "dotlink.toml")
///     .unwrap();
/// assert_eq!(config.links.len(), 1);
/// ```
pub fn from_slice(bytes: &[u8], file: &str) -> Result<Config, ConfigError> {
    let content = std::str::from_utf8(bytes).map_err(|source| ConfigError::Utf8 {
        file: file.to_string(),
        source,
    })?;
    toml::from_str(content).map_err(|e| ConfigError::Syntax {
        file: file.to_string(),
        message: e.message().to_string(),
    })
}

/// Read and decode the configuration file at `path` through `fs`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load(fs: &FileSystem, path: &Path) -> Result<Config, DotlinkError> {
    let bytes = fs.read_file(path)?;
    Ok(from_slice(&bytes, &path.display().to_string())?)
}
