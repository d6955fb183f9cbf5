//! Rebuild on change

use super::build::build_once;
use super::load_config;
use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use tracing::warn;
use withkit_core::BuildMode;

pub fn run(config_path: &Path, mode: Option<BuildMode>) -> Result<()> {
    let config = load_config(config_path, Some(mode.unwrap_or(BuildMode::Development)))?;

    if let Err(e) = build_once(&config) {
        eprintln!("Error: {:#}", e);
    }

    let (tx, rx) = mpsc::channel();
    let mut debouncer =
        new_debouncer(Duration::from_millis(500), tx).context("Failed to create file watcher")?;
    debouncer
        .watcher()
        .watch(&config.build.source_root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", config.build.source_root.display()))?;

    if let Some(proxy) = &config.build.proxy {
        println!("Proxy: {} (reload the browser after each rebuild)", proxy);
    }
    println!(
        "Watching {} for changes (Ctrl+C to stop)",
        config.build.source_root.display()
    );

    // One build at a time, on this thread
    for result in rx {
        match result {
            Ok(events) => {
                println!("\n{} change(s), rebuilding...", events.len());
                if let Err(e) = build_once(&config) {
                    eprintln!("Error: {:#}", e);
                }
            }
            Err(e) => warn!(error = ?e, "watch error"),
        }
    }
    Ok(())
}
