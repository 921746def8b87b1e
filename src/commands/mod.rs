//! Top-level subcommand orchestration.
pub mod completions;
pub mod init;
pub mod link;
pub mod show;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config;
use crate::fs::FileSystem;
use crate::logging::Logger;
use crate::parser::{ParseOptions, Parser, normalize};
use crate::tree::Tree;

/// Absolute locations every command works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Configuration file.
    pub config: PathBuf,
    /// Directory relative sources resolve against.
    pub base_dir: PathBuf,
    /// Directory relative targets resolve against.
    pub cwd: PathBuf,
}

impl Paths {
    /// Resolve the CLI options against the process working directory and
    /// home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the process working directory or the home
    /// directory cannot be determined when needed.
    pub fn resolve(global: &GlobalOpts) -> Result<Self> {
        let workdir = std::env::current_dir().context("cannot determine working directory")?;
        let home = match &global.cwd {
            Some(_) => None,
            None => Some(home_dir().context("cannot determine home directory; pass --cwd")?),
        };
        Ok(Self::resolve_in(global, &workdir, home))
    }

    /// Resolve against explicit working and home directories.
    ///
    /// `home` is only consulted when `--cwd` is absent; without either the
    /// working directory is used.
    #[must_use]
    pub fn resolve_in(global: &GlobalOpts, workdir: &Path, home: Option<PathBuf>) -> Self {
        let absolute = |p: &Path| normalize(&workdir.join(p));
        let config = absolute(&global.config);
        let base_dir = global.base_dir.as_deref().map_or_else(
            || {
                config
                    .parent()
                    .map_or_else(|| workdir.to_path_buf(), Path::to_path_buf)
            },
            absolute,
        );
        let cwd = global
            .cwd
            .as_deref()
            .map(absolute)
            .or(home)
            .unwrap_or_else(|| workdir.to_path_buf());
        Self {
            config,
            base_dir,
            cwd,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Shared state produced by the common command setup sequence: resolved
/// paths, loaded configuration and the parsed tree.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved locations.
    pub paths: Paths,
    /// Parsed link tree.
    pub tree: Tree,
}

impl CommandSetup {
    /// Resolve paths, load the configuration through `fs` and parse it.
    ///
    /// # Errors
    ///
    /// Returns an error if the paths cannot be resolved or the configuration
    /// cannot be read, decoded or parsed.
    pub fn init(global: &GlobalOpts, fs: &FileSystem, log: &Logger) -> Result<Self> {
        Self::with_paths(Paths::resolve(global)?, global.envsubst, fs, log)
    }

    /// [`init`](Self::init) with already resolved paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read, decoded or
    /// parsed.
    pub fn with_paths(
        paths: Paths,
        envsubst: bool,
        fs: &FileSystem,
        log: &Logger,
    ) -> Result<Self> {
        log.debug(&format!("config: {}", paths.config.display()));
        log.debug(&format!("base dir: {}", paths.base_dir.display()));
        log.debug(&format!("cwd: {}", paths.cwd.display()));

        let config = config::load(fs, &paths.config)?;
        let tree = Parser::new(ParseOptions {
            base_dir: paths.base_dir.clone(),
            cwd: paths.cwd.clone(),
            envsubst,
        })
        .parse(&config)?;
        log.debug(&format!(
            "{} top-level entries, {} nodes",
            tree.len(),
            tree.count()
        ));

        Ok(Self { paths, tree })
    }
}
