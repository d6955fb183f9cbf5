//! Two-tier file lookup
//!
//! A store has an override root (the child theme) and a base root (the parent
//! theme). Lookups consult the override root first.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use withkit_core::Tier;

/// Lookup order for two-tier resolution
const TIERS: [Tier; 2] = [Tier::Override, Tier::Base];

/// A pair of file trees where one overrides the other
pub trait OverridableStore {
    /// Root directory of a tier
    fn root(&self, tier: Tier) -> &Path;

    /// Whether `path` is an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Read a file's bytes
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Last-modified time in seconds since the epoch
    fn modified(&self, path: &Path) -> Option<u64>;

    /// Files directly inside `dir` whose extension is `extension`, sorted
    fn list_files(&self, dir: &Path, extension: &str) -> Vec<PathBuf>;

    /// Subdirectories directly inside `dir`, sorted
    fn list_dirs(&self, dir: &Path) -> Vec<PathBuf>;

    /// Find the tier that supplies `relative`, override first
    fn locate(&self, relative: &str) -> Option<(Tier, PathBuf)> {
        TIERS.iter().find_map(|&tier| {
            let candidate = self.root(tier).join(relative);
            self.is_file(&candidate).then_some((tier, candidate))
        })
    }

    /// Merge the listings of `relative_dir` from both tiers, keyed by file name.
    ///
    /// The base tier is read first, so an override file with the same name
    /// replaces the base file.
    fn overlay_listing(&self, relative_dir: &str, extension: &str) -> BTreeMap<String, (Tier, PathBuf)> {
        let mut by_name = BTreeMap::new();
        for tier in [Tier::Base, Tier::Override] {
            let dir = self.root(tier).join(relative_dir);
            for path in self.list_files(&dir, extension) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    by_name.insert(name.to_string(), (tier, path.clone()));
                }
            }
        }
        by_name
    }

    /// Names of subdirectories of `relative_dir` present in either tier
    fn overlay_dirs(&self, relative_dir: &str) -> Vec<String> {
        let mut names: Vec<String> = TIERS
            .iter()
            .flat_map(|&tier| self.list_dirs(&self.root(tier).join(relative_dir)))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Filesystem-backed store over a child and a parent theme directory
#[derive(Debug, Clone)]
pub struct FsStore {
    override_root: PathBuf,
    base_root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(override_root: P, base_root: Q) -> Self {
        Self {
            override_root: override_root.as_ref().to_path_buf(),
            base_root: base_root.as_ref().to_path_buf(),
        }
    }
}

impl OverridableStore for FsStore {
    fn root(&self, tier: Tier) -> &Path {
        match tier {
            Tier::Override => &self.override_root,
            Tier::Base => &self.base_root,
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn modified(&self, path: &Path) -> Option<u64> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        modified
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs())
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            .collect();
        files.sort();
        files
    }

    fn list_dirs(&self, dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        dirs
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: u64,
}

/// In-memory store for exercising resolution without touching the disk.
///
/// Files live under the virtual roots `/override` and `/base`.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    override_root: PathBuf,
    base_root: PathBuf,
    files: BTreeMap<PathBuf, MemoryFile>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            override_root: PathBuf::from("/override"),
            base_root: PathBuf::from("/base"),
            files: BTreeMap::new(),
        }
    }

    /// Add a file to a tier
    pub fn insert(&mut self, tier: Tier, relative: &str, content: impl Into<Vec<u8>>, modified: u64) {
        let path = self.root(tier).join(relative);
        self.files.insert(
            path,
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Builder form of [`MemoryStore::insert`]
    pub fn with(mut self, tier: Tier, relative: &str, content: impl Into<Vec<u8>>, modified: u64) -> Self {
        self.insert(tier, relative, content, modified);
        self
    }
}

impl OverridableStore for MemoryStore {
    fn root(&self, tier: Tier) -> &Path {
        match tier {
            Tier::Override => &self.override_root,
            Tier::Base => &self.base_root,
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn modified(&self, path: &Path) -> Option<u64> {
        self.files.get(path).map(|f| f.modified)
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Vec<PathBuf> {
        self.files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            .cloned()
            .collect()
    }

    fn list_dirs(&self, dir: &Path) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .files
            .keys()
            .filter_map(|p| {
                let rest = p.strip_prefix(dir).ok()?;
                let mut components = rest.components();
                let first = components.next()?;
                // Only paths with something below the first component imply a directory
                components.next()?;
                Some(dir.join(first))
            })
            .collect();
        dirs.dedup();
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_prefers_override() {
        let store = MemoryStore::new()
            .with(Tier::Base, "build/css/global.css", "base", 1)
            .with(Tier::Override, "build/css/global.css", "child", 2);

        let (tier, path) = store.locate("build/css/global.css").unwrap();
        assert_eq!(tier, Tier::Override);
        assert_eq!(path, PathBuf::from("/override/build/css/global.css"));
    }

    #[test]
    fn test_locate_falls_back_to_base() {
        let store = MemoryStore::new().with(Tier::Base, "build/css/screen.css", "base", 1);
        let (tier, _) = store.locate("build/css/screen.css").unwrap();
        assert_eq!(tier, Tier::Base);
        assert!(store.locate("build/css/editor.css").is_none());
    }

    #[test]
    fn test_overlay_listing_override_replaces_base() {
        let store = MemoryStore::new()
            .with(Tier::Override, "build/css/blocks/core-quote.css", "c", 3)
            .with(Tier::Base, "build/css/blocks/core-quote.css", "p", 1)
            .with(Tier::Base, "build/css/blocks/core-list.css", "p", 1)
            .with(Tier::Base, "build/css/blocks/readme.txt", "x", 1);

        let merged = store.overlay_listing("build/css/blocks", "css");
        assert_eq!(merged.len(), 2);
        let (tier, path) = &merged["core-quote.css"];
        assert_eq!(*tier, Tier::Override);
        assert_eq!(path, &PathBuf::from("/override/build/css/blocks/core-quote.css"));
        assert_eq!(merged["core-list.css"].0, Tier::Base);
    }

    #[test]
    fn test_overlay_dirs_unions_tiers() {
        let store = MemoryStore::new()
            .with(Tier::Base, "build/css/block-styles/outline/core-button.css", "", 1)
            .with(Tier::Override, "build/css/block-styles/outline/core-group.css", "", 1)
            .with(Tier::Override, "build/css/block-styles/shadow/core-image.css", "", 1);

        assert_eq!(
            store.overlay_dirs("build/css/block-styles"),
            vec!["outline".to_string(), "shadow".to_string()]
        );
    }

    #[test]
    fn test_fs_store_missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path().join("child"), dir.path().join("parent"));
        assert!(store.overlay_listing("build/css/blocks", "css").is_empty());
        assert!(store.overlay_dirs("build/css/block-styles").is_empty());
        assert!(store.locate("build/css/global.css").is_none());
    }

    #[test]
    fn test_fs_store_reads_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("child");
        fs::create_dir_all(child.join("build/css")).unwrap();
        fs::write(child.join("build/css/global.css"), "body{}").unwrap();

        let store = FsStore::new(&child, dir.path().join("parent"));
        let (tier, path) = store.locate("build/css/global.css").unwrap();
        assert_eq!(tier, Tier::Override);
        assert_eq!(store.read(&path).unwrap(), b"body{}");
        assert!(store.modified(&path).unwrap() > 0);
    }
}
