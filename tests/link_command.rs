#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `link` command against a real filesystem.

mod common;

use std::fs;

use common::IntegrationTestContext;
use dotlink::error::ConflictError;

const CONFIG: &str = r#"
[links]
bashrc = ".bashrc"
"git/config" = ".gitconfig"

[links.config]
target = ".config"
[links.config.links.nvim]
[links.config.links.alacritty]
source = "terminal/alacritty.toml"
target = "alacritty/alacritty.toml"

[links.secrets]
skip = true
"#;

fn context() -> IntegrationTestContext {
    IntegrationTestContext::new()
        .with_config(CONFIG)
        .with_source("bashrc", "export EDITOR=nvim\n")
        .with_source("git/config", "[user]\n")
        .with_source("config/nvim/init.lua", "-- nvim\n")
        .with_source("terminal/alacritty.toml", "[font]\n")
        .with_source("secrets", "hunter2\n")
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn links_tree_into_home() {
    let ctx = context();
    fs::create_dir_all(ctx.home().join(".config/alacritty")).unwrap();

    ctx.link().unwrap();

    let home = ctx.home();
    let repo = ctx.repo();
    assert_eq!(fs::read_link(home.join(".bashrc")).unwrap(), repo.join("bashrc"));
    assert_eq!(
        fs::read_link(home.join(".gitconfig")).unwrap(),
        repo.join("git/config")
    );
    assert!(
        fs::symlink_metadata(home.join(".config"))
            .unwrap()
            .file_type()
            .is_dir(),
        "group target must be a real directory"
    );
    assert_eq!(
        fs::read_link(home.join(".config/nvim")).unwrap(),
        repo.join("config/nvim")
    );
    assert_eq!(
        fs::read_to_string(home.join(".config/nvim/init.lua")).unwrap(),
        "-- nvim\n"
    );
    assert_eq!(
        fs::read_link(home.join(".config/alacritty/alacritty.toml")).unwrap(),
        repo.join("terminal/alacritty.toml")
    );
}

#[test]
fn nested_target_override_needs_existing_parent() {
    let ctx = context();

    // `.config/alacritty` does not exist, and leaves never create parents
    let err = ctx.link().unwrap_err();

    let conflicts = err.downcast_ref::<ConflictError>().expect("conflict error");
    assert_eq!(conflicts.errs.len(), 1);
    assert_eq!(
        conflicts.errs[0].path,
        ctx.home().join(".config/alacritty/alacritty.toml")
    );
}

#[test]
fn skipped_entry_is_not_linked() {
    let ctx = context();
    fs::create_dir_all(ctx.home().join(".config/alacritty")).unwrap();

    ctx.link().unwrap();

    assert!(fs::symlink_metadata(ctx.home().join("secrets")).is_err());
}

#[test]
fn second_run_is_a_no_op() {
    let ctx = context();
    fs::create_dir_all(ctx.home().join(".config/alacritty")).unwrap();

    ctx.link().unwrap();
    let before = fs::read_link(ctx.home().join(".bashrc")).unwrap();
    ctx.link().unwrap();

    assert_eq!(fs::read_link(ctx.home().join(".bashrc")).unwrap(), before);
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

#[test]
fn conflicts_never_overwrite_user_files() {
    let ctx = context()
        .with_home_file(".bashrc", "my own bashrc\n")
        .with_home_file(".config/alacritty/keep", "");
    std::os::unix::fs::symlink("/somewhere/else", ctx.home().join(".gitconfig")).unwrap();

    let err = ctx.link().unwrap_err();

    let conflicts = err.downcast_ref::<ConflictError>().expect("conflict error");
    let paths: Vec<_> = conflicts.errs.iter().map(|c| c.path.clone()).collect();
    assert_eq!(
        paths,
        vec![ctx.home().join(".bashrc"), ctx.home().join(".gitconfig")]
    );
    assert_eq!(
        fs::read_to_string(ctx.home().join(".bashrc")).unwrap(),
        "my own bashrc\n"
    );
    assert_eq!(
        fs::read_link(ctx.home().join(".gitconfig")).unwrap(),
        std::path::PathBuf::from("/somewhere/else")
    );
    // everything else was still linked
    assert_eq!(
        fs::read_link(ctx.home().join(".config/nvim")).unwrap(),
        ctx.repo().join("config/nvim")
    );
}

#[test]
fn group_target_that_is_a_file_conflicts() {
    let ctx = context().with_home_file(".config", "not a directory\n");

    let err = ctx.link().unwrap_err();

    let conflicts = err.downcast_ref::<ConflictError>().expect("conflict error");
    assert_eq!(conflicts.errs.len(), 1);
    assert_eq!(conflicts.errs[0].path, ctx.home().join(".config"));
    assert_eq!(
        conflicts.errs[0].reason.to_string(),
        "file exists and is not a directory"
    );
}
