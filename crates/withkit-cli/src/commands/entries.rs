//! Entry map listing

use super::{check_format, load_config};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use withkit_build::Pipeline;

pub fn run(config_path: &Path, format: &str) -> Result<()> {
    check_format(format)?;
    let config = load_config(config_path, None)?;
    let entries = Pipeline::new(&config)
        .discover()
        .context("Failed to discover entries")?;

    if format == "json" {
        let map: BTreeMap<String, Vec<PathBuf>> = entries
            .iter()
            .map(|entry| (entry.key, entry.sources))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("Entries ({}):", entries.len());
    for entry in entries.iter() {
        let sources: Vec<String> = entry
            .sources
            .iter()
            .map(|p| {
                p.strip_prefix(&config.build.source_root)
                    .unwrap_or(p)
                    .display()
                    .to_string()
            })
            .collect();
        println!("  {} <- {}", entry.key, sources.join(", "));
    }
    Ok(())
}
