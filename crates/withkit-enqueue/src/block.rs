//! Block names derived from stylesheet file names

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A block type name, `namespace/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BlockName {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for BlockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A stylesheet file name that does not encode a block name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{filename}' is not a block stylesheet name (expected 'namespace-block.css')")]
pub struct InvalidBlockFilename {
    pub filename: String,
}

/// Derive a block name from a per-block stylesheet file name.
///
/// The `.css` extension is dropped and the stem is split on its first hyphen
/// only: `core-paragraph.css` is `core/paragraph` and
/// `my-custom-block-name.css` is `my/custom-block-name`. Both halves must be
/// non-empty.
pub fn parse_block_filename(filename: &str) -> Result<BlockName, InvalidBlockFilename> {
    let invalid = || InvalidBlockFilename {
        filename: filename.to_string(),
    };
    let stem = filename.strip_suffix(".css").unwrap_or(filename);
    let (namespace, name) = stem.split_once('-').ok_or_else(invalid)?;
    if namespace.is_empty() || name.is_empty() {
        return Err(invalid());
    }
    Ok(BlockName {
        namespace: namespace.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_block() {
        let block = parse_block_filename("core-paragraph.css").unwrap();
        assert_eq!(block.to_string(), "core/paragraph");
    }

    #[test]
    fn test_splits_on_first_hyphen_only() {
        let block = parse_block_filename("my-custom-block-name.css").unwrap();
        assert_eq!(block.namespace, "my");
        assert_eq!(block.name, "custom-block-name");
        assert_eq!(block.to_string(), "my/custom-block-name");
    }

    #[test]
    fn test_no_hyphen_is_invalid() {
        let err = parse_block_filename("paragraph.css").unwrap_err();
        assert_eq!(err.filename, "paragraph.css");
    }

    #[test]
    fn test_empty_halves_are_invalid() {
        assert!(parse_block_filename("-paragraph.css").is_err());
        assert!(parse_block_filename("core-.css").is_err());
    }
}
