//! Configuration document model.
//!
//! The document is TOML.  A minimal configuration:
//!
//! ```toml
//! target = "${HOME}"
//!
//! [links]
//! bashrc = ".bashrc"
//! zshrc = {}
//!
//! [links.config]
//! target = ".config"
//! [links.config.links.nvim]
//! ```
pub mod loader;

pub use loader::{from_slice, load};

use serde::Deserialize;
use std::collections::BTreeMap;

/// Root of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of all sources, relative to the base directory.
    #[serde(default)]
    pub source: Option<String>,
    /// Root of all targets, relative to the working directory.
    #[serde(default)]
    pub target: Option<String>,
    /// Top-level entries keyed by name.
    #[serde(default)]
    pub links: BTreeMap<String, Entry>,
}

/// A single entry: either a plain target override or a full table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// `bashrc = ".bashrc"`: explicit target, everything else defaulted.
    Target(String),
    /// `zshrc = { skip = true }` or a `[links.name]` table.
    Table(EntryTable),
}

/// Fully specified entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryTable {
    /// Source override; relative values resolve against the base directory.
    #[serde(default)]
    pub source: Option<String>,
    /// Target override; relative values resolve against the parent's target.
    #[serde(default)]
    pub target: Option<String>,
    /// Ignore this entry and its subtree when linking.
    #[serde(default)]
    pub skip: bool,
    /// Place children directly in the parent's target directory.
    #[serde(default)]
    pub flatten: bool,
    /// Nested entries; a non-empty map makes this entry a group.
    #[serde(default)]
    pub links: BTreeMap<String, Entry>,
}

impl Entry {
    /// View this entry as a table, expanding the string shorthand.
    #[must_use]
    pub fn to_table(&self) -> EntryTable {
        match self {
            Self::Target(target) => EntryTable {
                target: Some(target.clone()),
                ..EntryTable::default()
            },
            Self::Table(table) => table.clone(),
        }
    }
}
