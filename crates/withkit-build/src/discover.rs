//! Entry point discovery
//!
//! Walks the source tree and maps output keys (e.g. `css/blocks/core/quote`)
//! to the source files that produce them.

use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use withkit_core::{Result, ThemeError};

const SCSS_EXTENSION: &str = ".scss";

/// One output bundle and the source files compiled into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    pub key: String,
    pub sources: Vec<PathBuf>,
}

impl BuildEntry {
    /// Whether the entry compiles stylesheet sources
    pub fn is_stylesheet(&self) -> bool {
        self.sources
            .first()
            .and_then(|p| p.extension())
            .map(|e| e == "scss")
            .unwrap_or(false)
    }
}

/// Output key to source mapping, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMap {
    entries: BTreeMap<String, Vec<PathBuf>>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-source entry.
    ///
    /// Two different sources producing the same key is a configuration error.
    pub fn insert(&mut self, key: impl Into<String>, source: PathBuf) -> Result<()> {
        self.insert_many(key, vec![source])
    }

    /// Add an entry that merges several sources into one bundle
    pub fn insert_many(&mut self, key: impl Into<String>, sources: Vec<PathBuf>) -> Result<()> {
        match self.entries.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(sources);
                Ok(())
            }
            btree_map::Entry::Occupied(slot) if slot.get() == &sources => Ok(()),
            btree_map::Entry::Occupied(slot) => Err(ThemeError::EntryCollision {
                key: slot.key().clone(),
                first: slot.get().first().cloned().unwrap_or_default(),
                second: sources.first().cloned().unwrap_or_default(),
            }),
        }
    }

    /// Merge entries from another discovery, failing on any key collision
    pub fn extend(&mut self, other: EntryMap) -> Result<()> {
        for (key, sources) in other.entries {
            self.insert_many(key, sources)?;
        }
        Ok(())
    }

    /// Merge entries from an override tree; its entries replace same-key ones
    pub fn overlay(&mut self, other: EntryMap) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&[PathBuf]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = BuildEntry> + '_ {
        self.entries.iter().map(|(key, sources)| BuildEntry {
            key: key.clone(),
            sources: sources.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sorted directory listing; a missing directory lists nothing
fn sorted_dir(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn scss_stem(name: &str) -> Option<&str> {
    name.strip_suffix(SCSS_EXTENSION).filter(|s| !s.is_empty())
}

/// Recursively collect `.scss` files under `root`.
///
/// `root/a/b.scss` becomes `{prefix}/a/b`; every subdirectory extends the
/// prefix with its own name.
pub fn recursive_entries(root: &Path, prefix: &str) -> Result<EntryMap> {
    let mut map = EntryMap::new();
    for entry in sorted_dir(root)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            map.extend(recursive_entries(&entry.path(), &format!("{}/{}", prefix, name))?)?;
        } else if file_type.is_file() {
            if let Some(stem) = scss_stem(&name) {
                map.insert(format!("{}/{}", prefix, stem), entry.path())?;
            }
        }
    }
    Ok(map)
}

/// Collect block style variations laid out as `root/{style}/{file}.scss`.
///
/// Exactly one level of style folders is read; files at the top level and
/// deeper folders are ignored.
pub fn style_block_entries(root: &Path, prefix: &str) -> Result<EntryMap> {
    let mut map = EntryMap::new();
    for style_dir in sorted_dir(root)? {
        if !style_dir.file_type()?.is_dir() {
            continue;
        }
        let style = style_dir.file_name().to_string_lossy().into_owned();
        for file in sorted_dir(&style_dir.path())? {
            if !file.file_type()?.is_file() {
                continue;
            }
            let name = file.file_name().to_string_lossy().into_owned();
            if let Some(stem) = scss_stem(&name) {
                map.insert(format!("{}/{}/{}", prefix, style, stem), file.path())?;
            }
        }
    }
    Ok(map)
}

/// Non-recursive, sorted list of `.scss` files in `dir`
pub fn scss_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in sorted_dir(dir)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && scss_stem(&name).is_some() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// All entries of a theme source tree.
///
/// Fixed entries are `css/global`, `css/screen`, `css/editor` and
/// `js/global`; fixed entries whose source is missing are skipped. Block
/// stylesheets, block style variations and the merged section bundle are
/// discovered.
pub fn theme_entries(source_root: &Path) -> Result<EntryMap> {
    if !source_root.is_dir() {
        return Err(ThemeError::SourceRootError {
            path: source_root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    fs::read_dir(source_root).map_err(|e| ThemeError::SourceRootError {
        path: source_root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let scss = source_root.join("scss");
    let mut map = EntryMap::new();

    let fixed = [
        ("css/global", scss.join("global.scss")),
        ("css/screen", scss.join("screen.scss")),
        ("css/editor", scss.join("editor.scss")),
        ("js/global", source_root.join("js").join("global.js")),
    ];
    for (key, source) in fixed {
        if source.is_file() {
            map.insert(key, source)?;
        } else {
            warn!(entry = key, source = %source.display(), "entry source missing, skipping");
        }
    }

    map.extend(recursive_entries(&scss.join("blocks"), "css/blocks")?)?;
    map.extend(style_block_entries(&scss.join("block-styles"), "css/block-styles")?)?;

    let sections = scss_files(&scss.join("styles").join("sections"))?;
    if !sections.is_empty() {
        map.insert_many("css/styles/sections", sections)?;
    }

    debug!(count = map.len(), "discovered entries");
    Ok(map)
}
