//! Turn a [`Config`] into a resolved [`Tree`].
//!
//! All paths leaving the parser are absolute and lexically normalized; any
//! structural problem (bad names, undefined variables, two entries claiming
//! the same target) is reported here so the linker never sees an invalid
//! tree.
mod envsubst;

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::config::{Config, Entry};
use crate::error::ParseError;
use crate::tree::{Node, Tree};

/// Contextual inputs for [`Parser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Directory relative source paths resolve against.
    pub base_dir: PathBuf,
    /// Directory relative target paths resolve against.
    pub cwd: PathBuf,
    /// Substitute `$VAR` / `${VAR}` references before resolving paths.
    pub envsubst: bool,
}

type Lookup = Box<dyn Fn(&str) -> Option<String>>;

/// Configuration parser.
///
/// # Examples
///
/// ```
/// use dotlink::parser::{ParseOptions, Parser};
/// use std::path::Path;
///
/// let config = dotlink::config::from_slice(b"[links]\nbashrc = \".bashrc\"\n", "dotlink.toml")
///     .unwrap();
/// let parser = Parser::new(ParseOptions {
///     base_dir: "/dotfiles".into(),
///     cwd: "/home/user".into(),
///     envsubst: false,
/// });
/// let tree = parser.parse(&config).unwrap();
/// let bashrc = tree.get("bashrc").unwrap();
/// assert_eq!(bashrc.source(), Path::new("/dotfiles/bashrc"));
/// assert_eq!(bashrc.target(), Path::new("/home/user/.bashrc"));
/// ```
pub struct Parser {
    options: ParseOptions,
    lookup: Lookup,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("options", &self.options)
            .field("lookup", &"<fn>")
            .finish()
    }
}

/// Directories an entry's children resolve against.
struct Scope<'a> {
    source: &'a Path,
    target: &'a Path,
    label: &'a str,
    skipped: bool,
}

impl Parser {
    /// Parser reading variables from the process environment.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self::with_lookup(options, |name| std::env::var(name).ok())
    }

    /// Parser reading variables through `lookup`.
    #[must_use]
    pub fn with_lookup(
        options: ParseOptions,
        lookup: impl Fn(&str) -> Option<String> + 'static,
    ) -> Self {
        Self {
            options,
            lookup: Box::new(lookup),
        }
    }


    /// Resolve `config` into a tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for relative base directories, invalid
    /// names, malformed paths, undefined variables, `flatten` on leaves, or
    /// two entries resolving to the same target.
    pub fn parse(&self, config: &Config) -> Result<Tree, ParseError> {
        require_absolute("base directory", &self.options.base_dir)?;
        require_absolute("working directory", &self.options.cwd)?;

        let source_root = match &config.source {
            Some(source) => resolve(&self.options.base_dir, &self.expand(source)?)?,
            None => normalize(&self.options.base_dir),
        };
        let target_root = match &config.target {
            Some(target) => resolve(&self.options.cwd, &self.expand(target)?)?,
            None => normalize(&self.options.cwd),
        };

        let root = Scope {
            source: &source_root,
            target: &target_root,
            label: "",
            skipped: false,
        };
        let mut claimed = HashMap::new();
        let nodes = config
            .links
            .iter()
            .map(|(name, entry)| self.node(name, entry, &root, &mut claimed))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Tree::new(nodes))
    }

    fn node(
        &self,
        name: &str,
        entry: &Entry,
        parent: &Scope<'_>,
        claimed: &mut HashMap<PathBuf, String>,
    ) -> Result<Node, ParseError> {
        validate_name(name)?;
        let table = entry.to_table();
        let label = if parent.label.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", parent.label)
        };

        if table.flatten && table.links.is_empty() {
            return Err(ParseError::FlattenLeaf(label));
        }

        let source = match &table.source {
            Some(source) => resolve(&self.options.base_dir, &self.expand(source)?)?,
            None => normalize(&parent.source.join(name)),
        };
        let target = match (&table.target, table.flatten) {
            (Some(target), true) => {
                return Err(ParseError::MalformedPath {
                    value: target.clone(),
                    reason: format!("'{label}' is flattened and cannot override its target"),
                });
            }
            (Some(target), false) => resolve(parent.target, &self.expand(target)?)?,
            (None, true) => parent.target.to_path_buf(),
            (None, false) => normalize(&parent.target.join(name)),
        };

        let skipped = parent.skipped || table.skip;
        if !skipped && !table.flatten {
            if let Some(first) = claimed.get(&target) {
                return Err(ParseError::DuplicateTarget {
                    target,
                    first: first.clone(),
                    second: label,
                });
            }
            claimed.insert(target.clone(), label.clone());
        }

        let scope = Scope {
            source: &source,
            target: &target,
            label: &label,
            skipped,
        };
        let children = table
            .links
            .iter()
            .map(|(child, entry)| self.node(child, entry, &scope, claimed))
            .collect::<Result<Vec<_>, _>>()?;

        let node = Node::group(name, source, target, children);
        Ok(if table.skip { node.skipped() } else { node })
    }

    fn expand(&self, value: &str) -> Result<String, ParseError> {
        if self.options.envsubst {
            envsubst::substitute(value, self.lookup.as_ref())
        } else {
            Ok(value.to_string())
        }
    }
}

fn require_absolute(what: &'static str, path: &Path) -> Result<(), ParseError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ParseError::RelativeBase {
            what,
            path: path.to_path_buf(),
        })
    }
}

fn validate_name(name: &str) -> Result<(), ParseError> {
    let path = Path::new(name);
    let valid = !name.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidName(name.to_string()))
    }
}

/// Resolve `value` against `base` unless it is already absolute.
fn resolve(base: &Path, value: &str) -> Result<PathBuf, ParseError> {
    if value.is_empty() {
        return Err(ParseError::MalformedPath {
            value: value.to_string(),
            reason: "empty path".to_string(),
        });
    }
    let path = Path::new(value);
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&base.join(path)))
    }
}

/// Lexically normalize `path`: drop `.` and fold `..` into its parent.
///
/// `..` at the root stays at the root.  Symlinks are not consulted.
///
/// # Examples
///
/// ```
/// use dotlink::parser::normalize;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize(Path::new("/home/./user/../other/")), PathBuf::from("/home/other"));
/// assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
