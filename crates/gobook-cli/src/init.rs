//! Starter configuration for `gobook init`.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{bail, Context, Result};
use gobook_config::{Config, DEFAULT_CONFIG_FILE};

/// Options for `gobook init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Repository owner, e.g. the GitHub organization.
    pub owner: Option<String>,

    /// Repository name (defaults to directory name).
    pub name: Option<String>,

    /// Replace an existing configuration file.
    pub force: bool,
}

/// Write a starter configuration in the current directory.
pub fn init_config(options: InitOptions) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let path = write_config(&current_dir, options)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Write the starter configuration into `dir`, returning its path.
fn write_config(dir: &Path, options: InitOptions) -> Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if path.exists() && !options.force {
        bail!(
            "Cannot initialize: `{}` already exists in this directory (use --force to overwrite)",
            DEFAULT_CONFIG_FILE
        );
    }

    let Some(owner) = options.owner.filter(|o| !o.trim().is_empty()) else {
        bail!("Repository owner is required (--owner)");
    };
    let name = match options.name {
        Some(n) => n,
        None => infer_repository_name(dir)?,
    };

    let content = Config::starter(owner.trim(), name.trim())
        .to_json_string()
        .context("Failed to serialize configuration")?;
    fs::write(&path, content + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Infer the repository name from the directory.
fn infer_repository_name(dir: &Path) -> Result<String> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
        .context("Cannot infer repository name from directory")?;

    Ok(name)
}
