//! `.asset.toml` manifest sidecars

use serde::{Deserialize, Serialize};
use withkit_core::{Result, ThemeError};

/// Suffix that replaces a compiled asset's extension to name its manifest
pub const MANIFEST_SUFFIX: &str = ".asset.toml";

/// Dependency and version record written next to every compiled bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub dependencies: Vec<String>,
    pub version: String,
}

/// On-disk shape, where either field may be missing
#[derive(Debug, Deserialize)]
struct RawManifest {
    dependencies: Option<Vec<String>>,
    version: Option<toml::Value>,
}

impl Manifest {
    pub fn new(dependencies: Vec<String>, version: impl Into<String>) -> Self {
        Self {
            dependencies,
            version: version.into(),
        }
    }

    /// Parse a manifest, returning `None` when it is not well-formed.
    ///
    /// A manifest is well-formed when it is valid TOML with both a
    /// `dependencies` array of strings and a scalar `version`.
    pub fn parse(content: &str) -> Option<Self> {
        let raw: RawManifest = toml::from_str(content).ok()?;
        let version = match raw.version? {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            _ => return None,
        };
        Some(Self {
            dependencies: raw.dependencies?,
            version,
        })
    }

    /// Serialize to the sidecar format
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(ThemeError::from)
    }
}

/// Derive the manifest path for an asset by replacing its extension.
///
/// `build/css/global.css` becomes `build/css/global.asset.toml`.
pub fn manifest_path_for(relative: &str) -> String {
    let file_start = relative.rfind('/').map(|i| i + 1).unwrap_or(0);
    let stem_end = match relative[file_start..].rfind('.') {
        Some(dot) if dot > 0 => file_start + dot,
        _ => relative.len(),
    };
    format!("{}{}", &relative[..stem_end], MANIFEST_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path_replaces_extension() {
        assert_eq!(
            manifest_path_for("build/css/global.css"),
            "build/css/global.asset.toml"
        );
        assert_eq!(
            manifest_path_for("build/js/global.js"),
            "build/js/global.asset.toml"
        );
    }

    #[test]
    fn test_manifest_path_only_touches_file_name() {
        assert_eq!(
            manifest_path_for("build/v1.2/editor"),
            "build/v1.2/editor.asset.toml"
        );
        assert_eq!(manifest_path_for(".hidden"), ".hidden.asset.toml");
    }

    #[test]
    fn test_parse_well_formed() {
        let m = Manifest::parse(
            r#"
dependencies = ["wp-blocks", "wp-dom-ready"]
version = "0a1b2c"
"#,
        )
        .unwrap();
        assert_eq!(m.dependencies, vec!["wp-blocks", "wp-dom-ready"]);
        assert_eq!(m.version, "0a1b2c");
    }

    #[test]
    fn test_parse_numeric_version() {
        let m = Manifest::parse("dependencies = []\nversion = 1700000000").unwrap();
        assert_eq!(m.version, "1700000000");
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        assert!(Manifest::parse(r#"version = "1""#).is_none());
        assert!(Manifest::parse("dependencies = []").is_none());
        assert!(Manifest::parse("not toml at all [").is_none());
        assert!(Manifest::parse("dependencies = []\nversion = [1]").is_none());
    }

    #[test]
    fn test_to_toml_parses_back() {
        let m = Manifest::new(vec!["wp-i18n".into()], "abc");
        let text = m.to_toml().unwrap();
        assert_eq!(Manifest::parse(&text), Some(m));
    }
}
