//! Reconcile a [`Tree`] with the filesystem.
//!
//! [`Linker::link`] walks the tree depth-first, siblings in name order,
//! and for every node decides whether to create a directory, create a
//! symlink, leave things alone, or record a conflict.  Conflicts never stop
//! the walk; they are collected and returned together once every other node
//! has been processed.  Existing entries are never removed or overwritten.
//!
//! [`Linker::plan`] performs the same walk with `stat` calls only and
//! describes what [`Linker::link`] would do.
use std::path::{Path, PathBuf};

pub use crate::error::{Conflict, ConflictError, ConflictReason, LinkError};

use crate::error::FsError;
use crate::fs::{FileInfo, FileKind, FileSystem};
use crate::tree::{Node, Tree};

/// Counters collected during a walk.
///
/// # Examples
///
/// ```
/// use dotlink::linker::LinkReport;
///
/// let report = LinkReport { linked: 3, already_linked: 10, dirs_created: 1, skipped: 0 };
/// assert_eq!(report.summary(false), "3 linked, 10 already ok, 1 directories created");
/// assert_eq!(report.summary(true), "3 would link, 10 already ok, 1 directories created");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    /// Symlinks created.
    pub linked: u32,
    /// Leaves that already pointed at their source.
    pub already_linked: u32,
    /// Group directories created.
    pub dirs_created: u32,
    /// Skipped nodes (subtrees count once).
    pub skipped: u32,
}

impl LinkReport {
    /// One-line summary (e.g. `"3 linked, 10 already ok, 1 skipped"`).
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would link" } else { "linked" };
        let mut out = format!("{} {verb}, {} already ok", self.linked, self.already_linked);
        if self.dirs_created > 0 {
            out.push_str(&format!(", {} directories created", self.dirs_created));
        }
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        out
    }
}

/// What the linker does (or would do) with one node.
#[derive(Debug)]
pub enum Action {
    /// The node is marked `skip`; its subtree is not visited.
    Skip,
    /// Group directory is absent and gets created.
    CreateDir,
    /// Group directory already exists.
    ExistingDir,
    /// Leaf target is absent and gets linked.
    CreateLink,
    /// Leaf target already links to its source.
    AlreadyLinked,
    /// The target is in the way.
    Conflict(ConflictReason),
}

/// One visited node in a [`Plan`].
#[derive(Debug)]
pub struct PlanEntry {
    /// Nesting level, `0` for top-level nodes.
    pub depth: usize,
    /// Node name within its parent.
    pub name: String,
    /// Link source.
    pub source: PathBuf,
    /// Link (or directory) target.
    pub target: PathBuf,
    /// Whether the node is a group.
    pub group: bool,
    /// Outcome for this node.
    pub action: Action,
}

/// Read-only description of a link walk.
#[derive(Debug, Default)]
pub struct Plan {
    /// Visited nodes in walk order.
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    /// Entries that would conflict.
    pub fn conflicts(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.action, Action::Conflict(_)))
    }

    /// Counters [`Linker::link`] would report if nothing changes meanwhile.
    #[must_use]
    pub fn report(&self) -> LinkReport {
        let mut report = LinkReport::default();
        for entry in &self.entries {
            match entry.action {
                Action::Skip => report.skipped += 1,
                Action::CreateDir => report.dirs_created += 1,
                Action::CreateLink => report.linked += 1,
                Action::AlreadyLinked => report.already_linked += 1,
                Action::ExistingDir | Action::Conflict(_) => {}
            }
        }
        report
    }
}

/// Conflicts and counters accumulated by [`Linker::link`].
#[derive(Default)]
struct Walk {
    report: LinkReport,
    conflicts: Vec<Conflict>,
}

impl Walk {
    fn conflict(&mut self, node: &Node, reason: ConflictReason) {
        tracing::debug!("conflict {}: {reason}", node.target().display());
        self.conflicts.push(Conflict {
            path: node.target().to_path_buf(),
            reason,
        });
    }
}

/// Creates the links described by a [`Tree`] through a [`FileSystem`].
#[derive(Debug, Clone, Copy)]
pub struct Linker<'fs> {
    fs: &'fs FileSystem,
}

impl<'fs> Linker<'fs> {
    /// Linker operating on `fs`.
    #[must_use]
    pub const fn new(fs: &'fs FileSystem) -> Self {
        Self { fs }
    }

    /// Link every node of `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Conflicts`] with every conflicting node once the
    /// walk is complete; all other nodes have been processed at that point.
    /// Returns [`LinkError::Fs`] immediately when the filesystem fails in a
    /// way that is not a per-node conflict (missing driver, `stat` or
    /// `mkdir` failures).
    pub fn link(&self, tree: &Tree) -> Result<LinkReport, LinkError> {
        let mut walk = Walk::default();
        for node in tree.nodes() {
            self.link_node(node, &mut walk)?;
        }
        if walk.conflicts.is_empty() {
            Ok(walk.report)
        } else {
            Err(LinkError::Conflicts(ConflictError {
                errs: walk.conflicts,
            }))
        }
    }

    fn link_node(&self, node: &Node, walk: &mut Walk) -> Result<(), FsError> {
        if node.skip() {
            tracing::debug!("skip {}", node.name());
            walk.report.skipped += 1;
            return Ok(());
        }

        let existing = self.fs.stat(node.target())?;

        if node.is_group() {
            match inspect_group(existing.as_ref()) {
                Action::CreateDir => {
                    self.fs.mkdir_all(node.target())?;
                    tracing::debug!("created {}", node.target().display());
                    walk.report.dirs_created += 1;
                }
                Action::Conflict(reason) => {
                    walk.conflict(node, reason);
                    return Ok(());
                }
                _ => {}
            }
            for child in node.children() {
                self.link_node(child, walk)?;
            }
            return Ok(());
        }

        match inspect_leaf(node, existing.as_ref()) {
            Action::CreateLink => match self.fs.symlink(node.source(), node.target()) {
                Ok(()) => {
                    tracing::debug!(
                        "linked {} -> {}",
                        node.target().display(),
                        node.source().display()
                    );
                    walk.report.linked += 1;
                }
                Err(FsError::Io { source, .. }) => {
                    walk.conflict(node, ConflictReason::LinkFailed { source });
                }
                Err(e @ FsError::NoDriver) => return Err(e),
            },
            Action::AlreadyLinked => {
                tracing::debug!("ok: {} (already linked)", node.target().display());
                walk.report.already_linked += 1;
            }
            Action::Conflict(reason) => walk.conflict(node, reason),
            Action::Skip | Action::CreateDir | Action::ExistingDir => {}
        }
        Ok(())
    }

    /// Describe what [`link`](Self::link) would do without changing anything.
    ///
    /// Paths below a directory the walk would create are reported without
    /// being inspected; the directory itself and its ancestors count as
    /// existing once scheduled.
    ///
    /// # Errors
    ///
    /// Returns an [`FsError`] when a `stat` call fails.
    pub fn plan(&self, tree: &Tree) -> Result<Plan, FsError> {
        let mut plan = Plan::default();
        let mut created = Vec::new();
        for node in tree.nodes() {
            self.plan_node(node, 0, &mut created, &mut plan)?;
        }
        Ok(plan)
    }

    fn plan_node(
        &self,
        node: &Node,
        depth: usize,
        created: &mut Vec<PathBuf>,
        plan: &mut Plan,
    ) -> Result<(), FsError> {
        let action = if node.skip() {
            Action::Skip
        } else {
            let existing = match scheduled(created, node.target()) {
                Some(state) => state,
                None => self.fs.stat(node.target())?,
            };
            if node.is_group() {
                inspect_group(existing.as_ref())
            } else {
                inspect_leaf(node, existing.as_ref())
            }
        };

        let descend = node.is_group() && matches!(action, Action::CreateDir | Action::ExistingDir);
        if matches!(action, Action::CreateDir) {
            created.push(node.target().to_path_buf());
        }
        plan.entries.push(PlanEntry {
            depth,
            name: node.name().to_string(),
            source: node.source().to_path_buf(),
            target: node.target().to_path_buf(),
            group: node.is_group(),
            action,
        });

        if descend {
            for child in node.children() {
                self.plan_node(child, depth + 1, created, plan)?;
            }
        }
        Ok(())
    }
}

/// State of `path` once the directories in `created` exist, or `None` when
/// the filesystem has to be asked.
///
/// `mkdir_all` leaves a directory at every scheduled path and its ancestors;
/// anything below a scheduled path did not exist before it was created.
fn scheduled(created: &[PathBuf], path: &Path) -> Option<Option<FileInfo>> {
    if created.iter().any(|dir| dir.starts_with(path)) {
        Some(Some(FileInfo::directory()))
    } else if created.iter().any(|dir| path.starts_with(dir)) {
        Some(None)
    } else {
        None
    }
}

fn inspect_group(existing: Option<&FileInfo>) -> Action {
    match existing {
        None => Action::CreateDir,
        Some(info) if info.is_dir() => Action::ExistingDir,
        Some(_) => Action::Conflict(ConflictReason::NotDirectory),
    }
}

fn inspect_leaf(node: &Node, existing: Option<&FileInfo>) -> Action {
    match existing.map(|info| &info.kind) {
        None => Action::CreateLink,
        Some(FileKind::Symlink { target }) if links_to(target, node.source()) => {
            Action::AlreadyLinked
        }
        Some(FileKind::Symlink { target }) => Action::Conflict(ConflictReason::WrongTarget {
            current: target.clone(),
        }),
        Some(FileKind::Regular | FileKind::Directory) => {
            Action::Conflict(ConflictReason::NotSymlink)
        }
    }
}

/// Component-wise path equality, ignoring the `\\?\` prefix Windows adds
/// to extended-length link targets.
fn links_to(current: &Path, source: &Path) -> bool {
    dunce::simplified(current) == dunce::simplified(source)
}
