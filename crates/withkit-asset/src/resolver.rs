//! Child-over-parent asset resolution

use crate::manifest::{manifest_path_for, Manifest};
use crate::store::OverridableStore;
use crate::types::{ResolvedAsset, ThemeUris, Version};
use tracing::debug;
use withkit_core::Tier;

/// Resolves relative asset paths against an [`OverridableStore`].
///
/// Every call re-reads the store; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ManifestResolver<S> {
    store: S,
}

impl<S: OverridableStore> ManifestResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve an asset and its manifest.
    ///
    /// The manifest is located with the same override-then-base rule as the
    /// asset, independently of where the asset itself was found. Without a
    /// well-formed manifest the version falls back to the asset's
    /// last-modified time, or [`Version::Unversioned`] if the asset is missing.
    pub fn resolve(&self, relative: &str) -> ResolvedAsset {
        let located = self.store.locate(relative);

        let (dependencies, version) = match self.load_manifest(relative) {
            Some(manifest) => (manifest.dependencies, Version::Token(manifest.version)),
            None => {
                let version = located
                    .as_ref()
                    .and_then(|(_, path)| self.store.modified(path))
                    .map(Version::Modified)
                    .unwrap_or(Version::Unversioned);
                (Vec::new(), version)
            }
        };

        let (tier, path) = match located {
            Some((tier, path)) => (Some(tier), Some(path)),
            None => (None, None),
        };

        debug!(relative, ?tier, %version, "resolved asset");

        ResolvedAsset {
            relative: relative.to_string(),
            path,
            tier,
            dependencies,
            version,
        }
    }

    /// Load the well-formed manifest for an asset, if any layer has one
    pub fn load_manifest(&self, relative: &str) -> Option<Manifest> {
        let manifest_relative = manifest_path_for(relative);
        let (_, path) = self.store.locate(&manifest_relative)?;
        let bytes = self.store.read(&path).ok()?;
        let parsed = std::str::from_utf8(&bytes).ok().and_then(Manifest::parse);
        if parsed.is_none() {
            debug!(manifest = %path.display(), "ignoring malformed manifest");
        }
        parsed
    }

    /// Public URI for an asset.
    ///
    /// Points into the child theme when it has the file, otherwise into the
    /// parent theme even if the parent lacks it too.
    pub fn uri(&self, relative: &str, uris: &ThemeUris) -> String {
        let tier = match self.store.locate(relative) {
            Some((Tier::Override, _)) => Tier::Override,
            _ => Tier::Base,
        };
        uris.join(tier, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FsStore, MemoryStore};
    use std::path::PathBuf;

    #[test]
    fn test_override_precedence() {
        let store = MemoryStore::new()
            .with(Tier::Base, "build/css/screen.css", "parent", 10)
            .with(Tier::Override, "build/css/screen.css", "child", 20);
        let resolver = ManifestResolver::new(store);

        let resolved = resolver.resolve("build/css/screen.css");
        assert!(resolved.exists());
        assert_eq!(resolved.tier, Some(Tier::Override));
        assert_eq!(
            resolved.path,
            Some(PathBuf::from("/override/build/css/screen.css"))
        );
        assert_eq!(resolved.version, Version::Modified(20));
    }

    #[test]
    fn test_manifest_supersedes_timestamp() {
        let store = MemoryStore::new()
            .with(Tier::Base, "build/js/global.js", "js", 10)
            .with(
                Tier::Base,
                "build/js/global.asset.toml",
                "dependencies = [\"wp-dom-ready\"]\nversion = \"abc123\"\n",
                11,
            );
        let resolved = ManifestResolver::new(store).resolve("build/js/global.js");

        assert_eq!(resolved.dependencies, vec!["wp-dom-ready"]);
        assert_eq!(resolved.version, Version::Token("abc123".into()));
    }

    #[test]
    fn test_manifest_resolved_independently_of_asset() {
        // Asset only in the child, manifest only in the parent
        let store = MemoryStore::new()
            .with(Tier::Override, "build/css/editor.css", "css", 5)
            .with(
                Tier::Base,
                "build/css/editor.asset.toml",
                "dependencies = []\nversion = \"from-parent\"\n",
                1,
            );
        let resolved = ManifestResolver::new(store).resolve("build/css/editor.css");

        assert_eq!(resolved.tier, Some(Tier::Override));
        assert_eq!(resolved.version, Version::Token("from-parent".into()));
    }

    #[test]
    fn test_malformed_manifest_falls_back_to_timestamp() {
        let store = MemoryStore::new()
            .with(Tier::Override, "build/css/global.css", "css", 77)
            .with(Tier::Override, "build/css/global.asset.toml", "version = \"1\"", 78);
        let resolved = ManifestResolver::new(store).resolve("build/css/global.css");

        assert!(resolved.dependencies.is_empty());
        assert_eq!(resolved.version, Version::Modified(77));
    }

    #[test]
    fn test_missing_asset_is_unversioned() {
        let resolved = ManifestResolver::new(MemoryStore::new()).resolve("build/css/nope.css");
        assert!(!resolved.exists());
        assert_eq!(resolved.path, None);
        assert_eq!(resolved.version, Version::Unversioned);
        assert!(resolved.dependencies.is_empty());
    }

    #[test]
    fn test_uri_follows_child_then_parent() {
        let store = MemoryStore::new().with(Tier::Override, "build/css/global.css", "", 1);
        let resolver = ManifestResolver::new(store);
        let uris = ThemeUris::new("/themes/child", "/themes/parent");

        assert_eq!(
            resolver.uri("build/css/global.css", &uris),
            "/themes/child/build/css/global.css"
        );
        assert_eq!(
            resolver.uri("build/css/missing.css", &uris),
            "/themes/parent/build/css/missing.css"
        );
    }

    #[test]
    fn test_fs_timestamp_fallback_matches_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("parent");
        std::fs::create_dir_all(parent.join("build/css")).unwrap();
        let file = parent.join("build/css/screen.css");
        std::fs::write(&file, "a{}").unwrap();

        let expected = std::fs::metadata(&file)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let resolver = ManifestResolver::new(FsStore::new(dir.path().join("child"), &parent));
        let resolved = resolver.resolve("build/css/screen.css");
        assert_eq!(resolved.tier, Some(Tier::Base));
        assert_eq!(resolved.version, Version::Modified(expected));
    }
}
