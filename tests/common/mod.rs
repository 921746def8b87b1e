// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles repository plus a separate
// fake home directory, so each test links real files on the real filesystem
// without touching the user's environment.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotlink::commands::{CommandSetup, Paths};
use dotlink::fs::FileSystem;
use dotlink::logging::Logger;

/// An isolated repository and home directory backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding `repo/` and `home/`.
    pub root: tempfile::TempDir,
    /// Filesystem backed by the operating system.
    pub fs: FileSystem,
}

impl IntegrationTestContext {
    /// Create empty `repo/` and `home/` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("repo")).expect("create repo dir");
        std::fs::create_dir_all(root.path().join("home")).expect("create home dir");
        Self {
            root,
            fs: FileSystem::os(),
        }
    }

    /// Dotfiles repository (base directory).
    pub fn repo(&self) -> PathBuf {
        self.root.path().join("repo")
    }

    /// Fake home directory (link targets).
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Write `dotlink.toml` in the repository.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.repo().join("dotlink.toml"), content).expect("write config");
        self
    }

    /// Create a source file at `rel` inside the repository.
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        write_file(&self.repo().join(rel), content);
        self
    }

    /// Create a file at `rel` inside the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.home().join(rel), content);
        self
    }

    /// Resolved paths for this context.
    pub fn paths(&self) -> Paths {
        Paths {
            config: self.repo().join("dotlink.toml"),
            base_dir: self.repo(),
            cwd: self.home(),
        }
    }

    /// Load and parse the configuration.
    pub fn setup(&self) -> CommandSetup {
        CommandSetup::with_paths(self.paths(), true, &self.fs, &Logger::default())
            .expect("load configuration")
    }

    /// Run the link step.
    pub fn link(&self) -> anyhow::Result<()> {
        let setup = self.setup();
        dotlink::commands::link::link_tree(&setup.tree, &self.fs, &Logger::default())
    }

    /// Replace the temp dir prefix with `[ROOT]` for stable snapshots.
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.root.path().display().to_string(), "[ROOT]")
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
