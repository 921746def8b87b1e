//! Command: print the resolved tree and what linking would do.
use std::fmt::Write as _;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::fs::FileSystem;
use crate::linker::{Action, Linker, Plan};
use crate::logging::Logger;

/// Run the show command.
///
/// # Errors
///
/// Returns an error if setup fails or a target cannot be inspected.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, fs: &FileSystem, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, fs, log)?;
    let plan = Linker::new(fs).plan(&setup.tree)?;
    print!("{}", render(&plan));
    log.info(&plan.report().summary(true));
    Ok(())
}

/// Render `plan` as an indented tree, one node per line.
///
/// # Examples
///
/// ```
/// use dotlink::commands::show::render;
/// use dotlink::fs::FileSystem;
/// use dotlink::linker::Linker;
/// use dotlink::tree::{Node, Tree};
///
/// // skipped nodes are never inspected, so no driver is needed
/// let tree = Tree::new([Node::leaf("vimrc", "/dotfiles/vimrc", "/home/user/.vimrc").skipped()]);
/// let plan = Linker::new(&FileSystem::default()).plan(&tree).unwrap();
/// assert_eq!(render(&plan), "vimrc -> /home/user/.vimrc [skip]\n");
/// ```
#[must_use]
pub fn render(plan: &Plan) -> String {
    let mut out = String::new();
    for entry in &plan.entries {
        let indent = "  ".repeat(entry.depth);
        let slash = if entry.group { "/" } else { "" };
        let status = match &entry.action {
            Action::Skip => "skip".to_string(),
            Action::CreateDir => "create".to_string(),
            Action::ExistingDir | Action::AlreadyLinked => "ok".to_string(),
            Action::CreateLink => "link".to_string(),
            Action::Conflict(reason) => format!("conflict: {reason}"),
        };
        let _ = writeln!(
            out,
            "{indent}{}{slash} -> {} [{status}]",
            entry.name,
            entry.target.display()
        );
    }
    out
}
