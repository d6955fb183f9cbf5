//! Content-based hashing for cache-busting

use sha2::{Digest, Sha256};
use std::fmt;

/// Length of the version token written into bundle manifests.
const VERSION_TOKEN_LEN: usize = 20;

/// A SHA-256 hash of a compiled bundle.
///
/// The short form is written as the `version` of an `.asset.toml` manifest,
/// so a bundle's cache-busting token only changes when its bytes change.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Full lowercase hex digest
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Short hex prefix used as a manifest version token
    pub fn version_token(&self) -> String {
        self.to_hex()[..VERSION_TOKEN_LEN].to_string()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_hashing() {
        let h1 = ContentHash::from_bytes(b"body{color:red}");
        let h2 = ContentHash::from_bytes(b"body{color:red}");
        assert_eq!(h1, h2);
        assert_eq!(h1.version_token(), h2.version_token());
    }

    #[test]
    fn test_different_content_different_token() {
        let h1 = ContentHash::from_bytes(b"a{}");
        let h2 = ContentHash::from_bytes(b"b{}");
        assert_ne!(h1.version_token(), h2.version_token());
    }

    #[test]
    fn test_version_token_length() {
        let h = ContentHash::from_bytes(b"hello");
        assert_eq!(h.to_hex().len(), 64);
        assert_eq!(h.version_token().len(), VERSION_TOKEN_LEN);
        assert!(h.to_hex().starts_with(&h.version_token()));
    }
}
