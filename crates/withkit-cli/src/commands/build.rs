//! One-shot build

use super::load_config;
use anyhow::{Context, Result};
use std::path::Path;
use withkit_build::{BuildReport, Pipeline, StampOutcome};
use withkit_core::{BuildMode, ThemeConfig};

pub fn run(config_path: &Path, mode: Option<BuildMode>) -> Result<()> {
    let config = load_config(config_path, mode)?;
    build_once(&config)?;
    Ok(())
}

/// Run the pipeline and print its summary
pub fn build_once(config: &ThemeConfig) -> Result<BuildReport> {
    let report = Pipeline::new(config).run().context("Build failed")?;
    print_report(config, &report);
    Ok(report)
}

fn print_report(config: &ThemeConfig, report: &BuildReport) {
    println!(
        "Built {} bundle(s) into {} ({})",
        report.bundle_count(),
        config.build.output_root.display(),
        report.mode
    );
    for bundle in &report.bundles {
        println!("  {}", bundle);
    }

    if let Some(transforms) = &report.transforms {
        println!(
            "Transforms: {} emitted, {} failed",
            transforms.emitted.len(),
            transforms.failed.len()
        );
        for failed in &transforms.failed {
            println!("  skipped: {}", failed.display());
        }
    }

    match report.stamp {
        StampOutcome::Stamped => println!(
            "Stamped version {} into {}",
            config.theme.version,
            config.build.stamp_file.display()
        ),
        StampOutcome::NoVersionLine => println!(
            "No Version: line in {}, left unchanged",
            config.build.stamp_file.display()
        ),
        StampOutcome::Missing => {}
    }
}
