//! Build orchestration
//!
//! A run discovers entries, compiles every entry in memory, and only then
//! writes bundles and their manifests. Production runs add the image and SVG
//! transforms. Every successful run ends by stamping the theme version.

use crate::compile::{CompiledBundle, Compiler, ScriptCompiler, ScssCompiler};
use crate::discover::{theme_entries, BuildEntry, EntryMap};
use crate::jobs::{plan_jobs, run_jobs, TransformReport};
use crate::stamp::{stamp_version, StampOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use withkit_asset::{manifest_path_for, Manifest};
use withkit_core::{BuildMode, ContentHash, Result, ThemeConfig};

/// Summary of a finished build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub mode: BuildMode,
    /// Bundles written, relative to the output root
    pub bundles: Vec<String>,
    /// `None` in development, where transforms do not run
    pub transforms: Option<TransformReport>,
    pub stamp: StampOutcome,
}

impl BuildReport {
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }
}

/// Build driver for one theme
#[derive(Debug, Clone)]
pub struct Pipeline {
    source_root: PathBuf,
    output_root: PathBuf,
    stamp_file: PathBuf,
    version: String,
    mode: BuildMode,
}

impl Pipeline {
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            source_root: config.build.source_root.clone(),
            output_root: config.build.output_root.clone(),
            stamp_file: config.build.stamp_file.clone(),
            version: config.theme.version.clone(),
            mode: config.build.mode,
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn discover(&self) -> Result<EntryMap> {
        theme_entries(&self.source_root)
    }

    /// Compile every entry; the first failure aborts with nothing written
    pub fn compile(&self, entries: &EntryMap) -> Result<Vec<(BuildEntry, CompiledBundle)>> {
        let scss = ScssCompiler::new(self.mode).with_load_path(self.source_root.join("scss"));
        let script = ScriptCompiler;

        let mut compiled = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            let bundle = if entry.is_stylesheet() {
                scss.compile(&entry)?
            } else {
                script.compile(&entry)?
            };
            compiled.push((entry, bundle));
        }
        Ok(compiled)
    }

    /// Write a bundle, then its manifest; returns the bundle path relative
    /// to the output root
    fn emit(&self, entry: &BuildEntry, bundle: &CompiledBundle) -> Result<String> {
        let relative = format!("{}.{}", entry.key, bundle.extension);
        let path = self.output_root.join(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &bundle.code)?;

        let manifest = Manifest::new(
            bundle.dependencies.clone(),
            ContentHash::from_bytes(&bundle.code).version_token(),
        );
        fs::write(
            self.output_root.join(manifest_path_for(&relative)),
            manifest.to_toml()?,
        )?;
        Ok(relative)
    }

    pub fn run(&self) -> Result<BuildReport> {
        info!(mode = %self.mode, source = %self.source_root.display(), "build started");

        let entries = self.discover()?;
        let compiled = self.compile(&entries)?;
        info!(count = compiled.len(), "compiled entries");

        let mut bundles = Vec::with_capacity(compiled.len());
        for (entry, bundle) in &compiled {
            bundles.push(self.emit(entry, bundle)?);
        }

        let transforms = if self.mode.is_production() {
            let jobs = plan_jobs(&self.source_root, &self.output_root)?;
            let report = run_jobs(&jobs);
            info!(
                emitted = report.emitted.len(),
                failed = report.failed.len(),
                "transforms finished"
            );
            Some(report)
        } else {
            None
        };

        let stamp = stamp_version(&self.stamp_file, &self.version)?;
        info!(bundles = bundles.len(), "build finished");

        Ok(BuildReport {
            mode: self.mode,
            bundles,
            transforms,
            stamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &Path) -> ThemeConfig {
        ThemeConfig::default().rebase(root)
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_manifest_version_is_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/js/global.js", "import '@wordpress/dom-ready';\n");

        let report = Pipeline::new(&config(dir.path())).run().unwrap();
        assert_eq!(report.bundles, vec!["js/global.js"]);

        let code = fs::read(dir.path().join("build/js/global.js")).unwrap();
        let manifest = Manifest::parse(
            &fs::read_to_string(dir.path().join("build/js/global.asset.toml")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.version, ContentHash::from_bytes(&code).version_token());
        assert_eq!(manifest.dependencies, vec!["wp-dom-ready"]);
    }

    #[test]
    fn test_compile_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/scss/global.scss", ".a { color: red; }");
        write(dir.path(), "src/scss/screen.scss", ".broken { color: ");

        let err = Pipeline::new(&config(dir.path())).run().unwrap_err();
        assert!(matches!(err, withkit_core::ThemeError::CompileError { .. }));
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn test_development_skips_transforms() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/scss/global.scss", ".a { color: red; }");
        write(dir.path(), "src/svg/icon.svg", "<svg width=\"1\" height=\"1\"/>");

        let report = Pipeline::new(&config(dir.path()))
            .with_mode(BuildMode::Development)
            .run()
            .unwrap();
        assert!(report.transforms.is_none());
        assert!(!dir.path().join("build/svg").exists());
        assert_eq!(report.stamp, StampOutcome::Missing);
    }
}
