//! CLI command implementations

pub mod build;
pub mod enqueue;
pub mod entries;
pub mod resolve;
pub mod watch;

use anyhow::{bail, Context, Result};
use std::path::Path;
use withkit_core::{BuildMode, ThemeConfig};

/// Load `theme.toml` with its relative paths resolved against the file's
/// directory. A `--mode` flag overrides the file and the environment.
pub fn load_config(path: &Path, mode: Option<BuildMode>) -> Result<ThemeConfig> {
    let mut config = ThemeConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("Failed to read current directory")?,
    };
    config = config.rebase(&dir);

    if let Some(mode) = mode {
        config.build.mode = mode;
    }
    config.validate().context("Invalid theme config")?;
    Ok(config)
}

/// Check a `--format` value against the formats a command supports
pub fn check_format(format: &str) -> Result<()> {
    match format {
        "text" | "json" => Ok(()),
        other => bail!("unknown format '{}'; expected text or json", other),
    }
}
