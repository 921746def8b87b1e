//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Link dotfiles into place from a declarative TOML tree",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Configuration file
    #[arg(short, long, global = true, default_value = "dotlink.toml")]
    pub config: PathBuf,

    /// Directory relative sources resolve against (default: the config file's directory)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Directory relative targets resolve against (default: home directory, not the
    /// process working directory)
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Disable `$VAR` expansion in paths
    #[arg(long = "no-envsubst", global = true, action = clap::ArgAction::SetFalse)]
    pub envsubst: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create missing symlinks and directories
    Link,
    /// Print the resolved link tree and the state of each target
    Show,
    /// Write a starter configuration listing the base directory
    Init(InitOpts),
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InitOpts {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
