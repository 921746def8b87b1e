//! Resolved link tree handed from the parser to the linker.
//!
//! Children live in a [`BTreeMap`], so every walk visits siblings in
//! lexicographic order of their names regardless of configuration order.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One mapping entry: either a leaf (one symlink) or a group (a directory
/// holding deeper links).
///
/// # Examples
///
/// ```
/// use dotlink::tree::Node;
///
/// let leaf = Node::leaf("bashrc", "/dotfiles/bashrc", "/home/user/.bashrc");
/// assert!(!leaf.is_group());
///
/// let group = Node::group(
///     "config",
///     "/dotfiles/config",
///     "/home/user/.config",
///     [Node::leaf("nvim", "/dotfiles/config/nvim", "/home/user/.config/nvim")],
/// );
/// assert!(group.is_group());
/// assert_eq!(group.children().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    source: PathBuf,
    target: PathBuf,
    children: BTreeMap<String, Self>,
    skip: bool,
}

impl Node {
    /// A leaf linking `target` to `source`.
    #[must_use]
    pub fn leaf(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            target: target.into(),
            children: BTreeMap::new(),
            skip: false,
        }
    }

    /// A group whose `target` directory hosts `children`.
    ///
    /// A later child replaces an earlier one with the same name.
    #[must_use]
    pub fn group(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        children: impl IntoIterator<Item = Self>,
    ) -> Self {
        Self {
            children: children
                .into_iter()
                .map(|child| (child.name.clone(), child))
                .collect(),
            ..Self::leaf(name, source, target)
        }
    }

    /// Mark this node (and therefore its subtree) as ignored by the linker.
    #[must_use]
    pub const fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Name of this entry within its parent.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path the link points at.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Absolute path where the link (or directory) is created.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Whether the linker must ignore this node and its subtree.
    #[must_use]
    pub const fn skip(&self) -> bool {
        self.skip
    }

    /// Whether this node is a group (has children).
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Children in traversal order.
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.values()
    }

    /// Child named `name`, if any.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }
}

/// The whole configuration: top-level nodes in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: BTreeMap<String, Node>,
}

impl Tree {
    /// Build a tree from top-level nodes.
    ///
    /// A later node replaces an earlier one with the same name.
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.name.clone(), node))
                .collect(),
        }
    }

    /// Top-level nodes in traversal order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Top-level node named `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Number of top-level nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes at every depth.
    #[must_use]
    pub fn count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.children().map(count).sum::<usize>()
        }
        self.nodes().map(count).sum()
    }
}
