//! Command: write a starter configuration.
use anyhow::{Result, bail};

use super::Paths;
use crate::cli::{GlobalOpts, InitOpts};
use crate::fs::FileSystem;
use crate::logging::Logger;

/// Permission bits for the generated file.
const CONFIG_MODE: u32 = 0o644;

/// Names never offered as link entries.
const IGNORED: &[&str] = &[".git", ".gitignore", ".gitmodules"];

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the configuration file already exists (without
/// `--force`), or the base directory cannot be listed, or the file cannot be
/// written.
pub fn run(global: &GlobalOpts, opts: &InitOpts, fs: &FileSystem, log: &Logger) -> Result<()> {
    init(&Paths::resolve(global)?, opts, fs, log)
}

/// [`run`] with already resolved paths.
///
/// # Errors
///
/// See [`run`].
pub fn init(paths: &Paths, opts: &InitOpts, fs: &FileSystem, log: &Logger) -> Result<()> {
    if !opts.force && fs.stat(&paths.config)?.is_some() {
        bail!(
            "{} already exists (use --force to overwrite)",
            paths.config.display()
        );
    }

    let config_name = paths.config.file_name();
    let mut names = Vec::new();
    for name in fs.read_dir(&paths.base_dir)? {
        if Some(name.as_os_str()) == config_name {
            continue;
        }
        // config keys are UTF-8, so such an entry could never be linked
        match name.into_string() {
            Ok(name) if IGNORED.contains(&name.as_str()) => {}
            Ok(name) => names.push(name),
            Err(name) => log.warn(&format!(
                "skipping {}: name is not valid UTF-8",
                paths.base_dir.join(name).display()
            )),
        }
    }
    log.debug(&format!(
        "{} entries in {}",
        names.len(),
        paths.base_dir.display()
    ));

    log.action(&format!(
        "write {} with {} entries",
        paths.config.display(),
        names.len()
    ));
    if log.is_dry_run() {
        return Ok(());
    }
    fs.write_file(&paths.config, starter_config(&names).as_bytes(), CONFIG_MODE)?;
    Ok(())
}

/// Starter configuration linking every name in `names` into the home
/// directory under the same name.
///
/// # Examples
///
/// ```
/// let text = dotlink::commands::init::starter_config(&["bashrc".to_string()]);
/// let config = dotlink::config::from_slice(text.as_bytes(), "dotlink.toml").unwrap();
/// assert!(config.links.contains_key("bashrc"));
/// ```
#[must_use]
pub fn starter_config(names: &[String]) -> String {
    let mut out = String::from("target = \"${HOME}\"\n\n[links]\n");
    for name in names {
        out.push_str(&toml::Value::String(name.clone()).to_string());
        out.push_str(" = {}\n");
    }
    out
}
