//! Command: create missing links.
use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::fs::FileSystem;
use crate::linker::{Action, LinkError, Linker, Plan};
use crate::logging::Logger;
use crate::tree::Tree;

/// Run the link command.
///
/// Every conflict is logged as its own error line before the command fails.
///
/// # Errors
///
/// Returns an error if setup fails, if any node conflicts, or if the
/// filesystem fails fatally.
pub fn run(global: &GlobalOpts, fs: &FileSystem, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, fs, log)?;
    link_tree(&setup.tree, fs, log)
}

/// Link `tree` through `fs`, or preview the changes when `log` is in
/// dry-run mode.
///
/// # Errors
///
/// See [`run`].
pub fn link_tree(tree: &Tree, fs: &FileSystem, log: &Logger) -> Result<()> {
    let linker = Linker::new(fs);

    if log.is_dry_run() {
        log.stage("Planning links");
        let plan = linker.plan(tree)?;
        report_plan(&plan, log);
        log.info(&plan.report().summary(true));
        let conflicts = plan.conflicts().count();
        if conflicts > 0 {
            bail!("{conflicts} conflict(s) would prevent linking");
        }
        return Ok(());
    }

    log.stage("Linking");
    match linker.link(tree) {
        Ok(report) => {
            log.info(&report.summary(false));
            Ok(())
        }
        Err(LinkError::Conflicts(err)) => {
            for conflict in &err.errs {
                log.error(&conflict.to_string());
            }
            Err(err.into())
        }
        Err(err @ LinkError::Fs(_)) => Err(err.into()),
    }
}

fn report_plan(plan: &Plan, log: &Logger) {
    for entry in &plan.entries {
        let target = entry.target.display();
        match &entry.action {
            Action::CreateDir => log.action(&format!("create directory {target}")),
            Action::CreateLink => {
                log.action(&format!("link {target} -> {}", entry.source.display()));
            }
            Action::Conflict(reason) => log.error(&format!("{target}: {reason}")),
            Action::AlreadyLinked => log.debug(&format!("ok: {target}")),
            Action::ExistingDir => log.debug(&format!("exists: {target}")),
            Action::Skip => log.debug(&format!("skip: {}", entry.name)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::fs::FileInfo;
    use crate::fs::spy::SpyDriver;
    use crate::logging::capture;
    use crate::tree::Node;
    use std::path::Path;
    use tracing::Level;

    fn tree() -> Tree {
        Tree::new([
            Node::leaf("a", "/src/a", "/home/a"),
            Node::leaf("b", "/src/b", "/home/b"),
            Node::leaf("c", "/src/c", "/home/c"),
        ])
    }

    #[test]
    fn links_everything_on_clean_filesystem() {
        let spy = SpyDriver::new();
        let fs = FileSystem::new(spy.clone());

        link_tree(&tree(), &fs, &Logger::new(false)).unwrap();

        assert_eq!(
            spy.entry(Path::new("/home/c")),
            Some(FileInfo::symlink("/src/c"))
        );
    }

    #[test]
    fn each_conflict_is_logged_once() {
        let (events, _guard) = capture();
        let spy = SpyDriver::new()
            .with_file("/home/a", "")
            .with_symlink("/home/c", "/elsewhere");
        let fs = FileSystem::new(spy.clone());
        let log = Logger::new(false);

        let err = link_tree(&tree(), &fs, &log).unwrap_err();

        assert_eq!(err.to_string(), "2 conflicts");
        let errors: Vec<String> = events
            .take()
            .into_iter()
            .filter(|e| e.level == Level::ERROR)
            .map(|e| e.message)
            .collect();
        assert_eq!(
            errors,
            vec![
                "/home/a: file exists and is not a symlink".to_string(),
                "/home/c: symlink points to /elsewhere".to_string(),
            ]
        );
        // the non-conflicting sibling was still linked
        assert_eq!(
            spy.entry(Path::new("/home/b")),
            Some(FileInfo::symlink("/src/b"))
        );
    }

    #[test]
    fn dry_run_changes_nothing() {
        let (events, _guard) = capture();
        let spy = SpyDriver::new();
        let fs = FileSystem::new(spy.clone());

        link_tree(&tree(), &fs, &Logger::new(true)).unwrap();

        assert!(spy.mutations().is_empty());
        let dry_runs: Vec<String> = events
            .take()
            .into_iter()
            .filter(|e| e.target == crate::logging::DRY_RUN_TARGET)
            .map(|e| e.message)
            .collect();
        assert_eq!(dry_runs.len(), 3);
        assert_eq!(dry_runs[0], "link /home/a -> /src/a");
    }

    #[test]
    fn dry_run_fails_on_conflicts() {
        let (_events, _guard) = capture();
        let spy = SpyDriver::new().with_dir("/home/b");
        let fs = FileSystem::new(spy.clone());

        let err = link_tree(&tree(), &fs, &Logger::new(true)).unwrap_err();

        assert!(err.to_string().contains("1 conflict"), "got: {err}");
        assert!(spy.mutations().is_empty());
    }

    #[test]
    fn missing_driver_is_reported_as_error() {
        let err = link_tree(&tree(), &FileSystem::default(), &Logger::new(false)).unwrap_err();
        assert!(err.to_string().contains("no filesystem driver"), "got: {err}");
    }
}
