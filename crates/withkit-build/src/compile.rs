//! Entry compilation

use crate::discover::BuildEntry;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use withkit_core::{BuildMode, Result, ThemeError};

/// Output of compiling one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBundle {
    pub code: Vec<u8>,
    /// Host handles the bundle needs loaded first
    pub dependencies: Vec<String>,
    /// File extension of the emitted bundle, without the dot
    pub extension: &'static str,
}

/// Turns an entry's sources into a single bundle
pub trait Compiler {
    fn compile(&self, entry: &BuildEntry) -> Result<CompiledBundle>;
}

/// Sass compiler backed by `grass`
#[derive(Debug, Clone)]
pub struct ScssCompiler {
    mode: BuildMode,
    load_paths: Vec<PathBuf>,
}

impl ScssCompiler {
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            load_paths: Vec::new(),
        }
    }

    /// Extra directory searched by `@use` and `@import`
    pub fn with_load_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.load_paths.push(path.as_ref().to_path_buf());
        self
    }

    fn compile_file(&self, key: &str, source: &Path) -> Result<String> {
        let style = if self.mode.is_production() {
            grass::OutputStyle::Compressed
        } else {
            grass::OutputStyle::Expanded
        };
        let mut options = grass::Options::default().style(style);
        if let Some(dir) = source.parent() {
            options = options.load_path(dir);
        }
        for path in &self.load_paths {
            options = options.load_path(path);
        }
        grass::from_path(source, &options).map_err(|e| ThemeError::CompileError {
            entry: key.to_string(),
            reason: format!("{}: {}", source.display(), e),
        })
    }
}

impl Compiler for ScssCompiler {
    fn compile(&self, entry: &BuildEntry) -> Result<CompiledBundle> {
        let mut parts = Vec::with_capacity(entry.sources.len());
        for source in &entry.sources {
            parts.push(self.compile_file(&entry.key, source)?);
        }
        Ok(CompiledBundle {
            code: parts.join("\n").into_bytes(),
            dependencies: Vec::new(),
            extension: "css",
        })
    }
}

/// Script "compiler": concatenates sources and extracts host dependencies.
///
/// Module bundling is left to the host's own tooling.
#[derive(Debug, Clone, Default)]
pub struct ScriptCompiler;

impl Compiler for ScriptCompiler {
    fn compile(&self, entry: &BuildEntry) -> Result<CompiledBundle> {
        let mut code = String::new();
        for source in &entry.sources {
            let text = std::fs::read_to_string(source).map_err(|e| ThemeError::CompileError {
                entry: entry.key.clone(),
                reason: format!("{}: {}", source.display(), e),
            })?;
            if !code.is_empty() {
                code.push('\n');
            }
            code.push_str(&text);
        }
        Ok(CompiledBundle {
            dependencies: extract_script_dependencies(&code),
            code: code.into_bytes(),
            extension: "js",
        })
    }
}

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?:\bimport\s+(?:[\w*{}\s,$]+\s+from\s+)?|\brequire\s*\(\s*)['"]([^'"]+)['"]"#)
            .expect("static import pattern")
    })
}

/// Host-provided handles for the modules a script imports.
///
/// `@wordpress/foo-bar` maps to `wp-foo-bar`; `react`, `react-dom`,
/// `lodash` and `jquery` map to the same-named handles. Other modules are
/// assumed bundled. The result is sorted and deduplicated.
pub fn extract_script_dependencies(code: &str) -> Vec<String> {
    let handles: BTreeSet<String> = import_pattern()
        .captures_iter(code)
        .filter_map(|caps| {
            let module = caps.get(1)?.as_str();
            if let Some(package) = module.strip_prefix("@wordpress/") {
                let package = package.split('/').next().unwrap_or(package);
                return Some(format!("wp-{}", package));
            }
            match module {
                "react" | "react-dom" | "lodash" | "jquery" => Some(module.to_string()),
                _ => None,
            }
        })
        .collect();
    handles.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extract_wordpress_dependencies() {
        let code = r#"
import domReady from '@wordpress/dom-ready';
import { __ } from "@wordpress/i18n";
import apiFetch from '@wordpress/api-fetch/build';
const $ = require( 'jquery' );
import './local';
import 'some-vendor-lib';
import domReadyAgain from '@wordpress/dom-ready';
"#;
        assert_eq!(
            extract_script_dependencies(code),
            vec!["jquery", "wp-api-fetch", "wp-dom-ready", "wp-i18n"]
        );
    }

    #[test]
    fn test_no_imports_no_dependencies() {
        assert!(extract_script_dependencies("console.log('important');").is_empty());
    }

    #[test]
    fn test_script_compiler_concatenates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        fs::write(&a, "import '@wordpress/hooks';").unwrap();
        fs::write(&b, "let x = 1;").unwrap();

        let bundle = ScriptCompiler
            .compile(&BuildEntry {
                key: "js/global".into(),
                sources: vec![a, b],
            })
            .unwrap();
        assert_eq!(bundle.extension, "js");
        assert_eq!(bundle.dependencies, vec!["wp-hooks"]);
        assert_eq!(
            String::from_utf8(bundle.code).unwrap(),
            "import '@wordpress/hooks';\nlet x = 1;"
        );
    }

    #[test]
    fn test_scss_compiles_nested_rules() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("global.scss");
        fs::write(&source, "$c: red;\n.a { .b { color: $c; } }\n").unwrap();

        let bundle = ScssCompiler::new(BuildMode::Production)
            .compile(&BuildEntry {
                key: "css/global".into(),
                sources: vec![source],
            })
            .unwrap();
        let css = String::from_utf8(bundle.code).unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("red"));
        assert_eq!(bundle.extension, "css");
    }

    #[test]
    fn test_scss_resolves_partials_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_vars.scss"), "$gap: 4px;").unwrap();
        let source = dir.path().join("screen.scss");
        fs::write(&source, "@import 'vars';\n.g { gap: $gap; }").unwrap();

        let bundle = ScssCompiler::new(BuildMode::Development)
            .compile(&BuildEntry {
                key: "css/screen".into(),
                sources: vec![source],
            })
            .unwrap();
        assert!(String::from_utf8(bundle.code).unwrap().contains("4px"));
    }

    #[test]
    fn test_scss_error_names_entry() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.scss");
        fs::write(&source, ".a { color: ").unwrap();

        let err = ScssCompiler::new(BuildMode::Development)
            .compile(&BuildEntry {
                key: "css/broken".into(),
                sources: vec![source],
            })
            .unwrap_err();
        assert!(matches!(err, ThemeError::CompileError { ref entry, .. } if entry == "css/broken"));
    }
}
