//! Declarative dotfile linker.
//!
//! A TOML document describes a tree of links; `dotlink` resolves it into
//! absolute paths and reconciles the filesystem with it by creating missing
//! directories and symlinks.  Existing files are never touched: anything in
//! the way is reported as a conflict, and every conflict of a run is
//! reported together.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: deserialize the TOML document
//! - **[`parser`]**: resolve names, overrides and `$VAR` references into a [`tree::Tree`]
//! - **[`linker`]**: walk the tree and create links through the [`fs`] port
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `show`, `init`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod linker;
pub mod logging;
pub mod parser;
pub mod tree;
