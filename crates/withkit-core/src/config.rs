//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `NODE_ENV`, `WITHKIT_MODE`, `WITHKIT_PROXY`
//! 2. Project file: `theme.toml`
//! 3. Built-in defaults

use crate::error::{Result, ThemeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default project config file name
pub const CONFIG_FILE: &str = "theme.toml";

/// Whether the pipeline runs the production-only transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Production,
    #[default]
    Development,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        self == BuildMode::Production
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Production => write!(f, "production"),
            BuildMode::Development => write!(f, "development"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(BuildMode::Production),
            "development" | "dev" => Ok(BuildMode::Development),
            other => Err(ThemeError::ConfigError(format!(
                "unknown build mode '{}' (use 'production' or 'development')",
                other
            ))),
        }
    }
}

/// Theme identity and layer locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSection {
    /// Handle prefix, e.g. `withkit-starter`
    #[serde(default = "default_slug")]
    pub slug: String,
    /// Version stamped into the stamp file after each build
    #[serde(default = "default_version")]
    pub version: String,
    /// Child theme directory
    #[serde(default = "default_override_root")]
    pub override_root: PathBuf,
    /// Parent theme directory
    #[serde(default = "default_base_root")]
    pub base_root: PathBuf,
    #[serde(default)]
    pub override_uri: String,
    #[serde(default)]
    pub base_uri: String,
}

impl Default for ThemeSection {
    fn default() -> Self {
        Self {
            slug: default_slug(),
            version: default_version(),
            override_root: default_override_root(),
            base_root: default_base_root(),
            override_uri: String::new(),
            base_uri: String::new(),
        }
    }
}

fn default_slug() -> String {
    "withkit-starter".to_string()
}
fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_override_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_base_root() -> PathBuf {
    PathBuf::from("../withkit")
}

/// Build pipeline paths and mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// File whose `Version:` header is rewritten after a build
    #[serde(default = "default_stamp_file")]
    pub stamp_file: PathBuf,
    #[serde(default)]
    pub mode: BuildMode,
    /// Local site URL used by live-reload tooling during `watch`
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            output_root: default_output_root(),
            stamp_file: default_stamp_file(),
            mode: BuildMode::default(),
            proxy: None,
        }
    }
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}
fn default_output_root() -> PathBuf {
    PathBuf::from("build")
}
fn default_stamp_file() -> PathBuf {
    PathBuf::from("style.css")
}

/// A block pattern category to register at init
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCategoryConfig {
    pub slug: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// A block style variation to register at init
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStyleConfig {
    /// Block type, e.g. `core/paragraph`
    pub block: String,
    /// Variation name, e.g. `with-test-block-style`
    pub name: String,
    pub label: String,
}

/// Top-level `theme.toml` structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub theme: ThemeSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub pattern_categories: Vec<PatternCategoryConfig>,
    #[serde(default)]
    pub block_styles: Vec<BlockStyleConfig>,
}

impl ThemeConfig {
    /// Load config with layered precedence: defaults < file < env vars.
    ///
    /// A missing file is not an error; the defaults are used instead.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config file without environment overrides
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ThemeError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Resolve all relative paths against the directory holding the config
    pub fn rebase(mut self, dir: &Path) -> Self {
        let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { dir.join(p) };
        self.theme.override_root = join(&self.theme.override_root);
        self.theme.base_root = join(&self.theme.base_root);
        self.build.source_root = join(&self.build.source_root);
        self.build.output_root = join(&self.build.output_root);
        self.build.stamp_file = join(&self.build.stamp_file);
        self
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// `WITHKIT_MODE` wins over `NODE_ENV`; only `NODE_ENV=production`
    /// selects production, any other value selects development.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("WITHKIT_MODE") {
            self.build.mode = mode.parse()?;
        } else if let Some(node_env) = lookup("NODE_ENV") {
            self.build.mode = if node_env == "production" {
                BuildMode::Production
            } else {
                BuildMode::Development
            };
        }
        if let Some(proxy) = lookup("WITHKIT_PROXY") {
            self.build.proxy = Some(proxy);
        }
        Ok(())
    }

    /// Check for values that would make every build fail
    pub fn validate(&self) -> Result<()> {
        if self.theme.slug.trim().is_empty() {
            return Err(ThemeError::ConfigError("theme.slug must not be empty".into()));
        }
        for style in &self.block_styles {
            if !style.block.contains('/') {
                return Err(ThemeError::ConfigError(format!(
                    "block style '{}' targets '{}', expected 'namespace/name'",
                    style.name, style.block
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[theme]
slug = "acme-child"
version = "2.4.0"
base_root = "../acme"

[build]
mode = "production"
proxy = "http://acme.local"

[[pattern_categories]]
slug = "acme-child/heroes"
label = "Heroes"

[[block_styles]]
block = "core/paragraph"
name = "lead"
label = "Lead"
"#,
        )
        .unwrap();

        let config = ThemeConfig::load_file(&path).unwrap();
        assert_eq!(config.theme.slug, "acme-child");
        assert_eq!(config.theme.version, "2.4.0");
        assert_eq!(config.build.mode, BuildMode::Production);
        assert_eq!(config.build.proxy.as_deref(), Some("http://acme.local"));
        assert_eq!(config.build.source_root, PathBuf::from("src"));
        assert_eq!(config.pattern_categories[0].description, "");
        assert_eq!(config.block_styles[0].block, "core/paragraph");
    }

    #[test]
    fn test_defaults_and_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ThemeConfig::load_file(&dir.path().join("absent.toml"));
        assert!(config.is_err());

        let config = ThemeConfig::default();
        assert_eq!(config.theme.slug, "withkit-starter");
        assert_eq!(config.build.mode, BuildMode::Development);
        assert_eq!(config.build.stamp_file, PathBuf::from("style.css"));
    }

    #[test]
    fn test_node_env_selects_mode() {
        let mut config = ThemeConfig::default();
        config
            .apply_env_overrides(env(&[("NODE_ENV", "production")]))
            .unwrap();
        assert!(config.build.mode.is_production());

        config
            .apply_env_overrides(env(&[("NODE_ENV", "test")]))
            .unwrap();
        assert_eq!(config.build.mode, BuildMode::Development);
    }

    #[test]
    fn test_explicit_mode_wins_over_node_env() {
        let mut config = ThemeConfig::default();
        config
            .apply_env_overrides(env(&[
                ("NODE_ENV", "production"),
                ("WITHKIT_MODE", "development"),
                ("WITHKIT_PROXY", "https://mysite.local"),
            ]))
            .unwrap();
        assert_eq!(config.build.mode, BuildMode::Development);
        assert_eq!(config.build.proxy.as_deref(), Some("https://mysite.local"));
    }

    #[test]
    fn test_invalid_mode_is_config_error() {
        let mut config = ThemeConfig::default();
        let err = config
            .apply_env_overrides(env(&[("WITHKIT_MODE", "staging")]))
            .unwrap_err();
        assert!(matches!(err, ThemeError::ConfigError(_)));
    }

    #[test]
    fn test_rebase_keeps_absolute_paths() {
        let mut config = ThemeConfig::default();
        config.build.output_root = PathBuf::from("/abs/build");
        let config = config.rebase(Path::new("/project"));
        assert_eq!(config.build.output_root, PathBuf::from("/abs/build"));
        assert_eq!(config.build.source_root, PathBuf::from("/project/src"));
        assert_eq!(config.theme.override_root, PathBuf::from("/project/."));
    }

    #[test]
    fn test_validate_rejects_unqualified_block() {
        let mut config = ThemeConfig::default();
        config.block_styles.push(BlockStyleConfig {
            block: "paragraph".into(),
            name: "lead".into(),
            label: "Lead".into(),
        });
        assert!(config.validate().is_err());
    }
}
