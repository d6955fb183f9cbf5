//! Resolution result types

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use withkit_core::Tier;

/// Cache-busting token handed to the host alongside an asset URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// Version string taken from a manifest
    Token(String),
    /// Last-modified time of the resolved file, in seconds since the epoch
    Modified(u64),
    /// The asset does not exist; the host must not append a version.
    ///
    /// Distinct from `Token(String::new())`.
    Unversioned,
}

impl Version {
    /// Whether the host should append this version to the URI
    pub fn is_versioned(&self) -> bool {
        !matches!(self, Version::Unversioned)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Token(token) => write!(f, "{}", token),
            Version::Modified(secs) => write!(f, "{}", secs),
            Version::Unversioned => write!(f, "false"),
        }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Version::Token(token) => serializer.serialize_str(token),
            Version::Modified(secs) => serializer.serialize_u64(*secs),
            Version::Unversioned => serializer.serialize_bool(false),
        }
    }
}

/// The outcome of resolving a relative asset path against both theme layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAsset {
    /// Path relative to the theme root, e.g. `build/css/screen.css`
    pub relative: String,
    /// Physical file that supplies the asset, if any layer has it
    pub path: Option<PathBuf>,
    /// Layer the file came from
    pub tier: Option<Tier>,
    /// Handles this asset depends on, in manifest order
    pub dependencies: Vec<String>,
    pub version: Version,
}

impl ResolvedAsset {
    /// Whether either layer contains the asset
    pub fn exists(&self) -> bool {
        self.tier.is_some()
    }
}

/// Public base URIs of the two theme layers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeUris {
    pub override_uri: String,
    pub base_uri: String,
}

impl ThemeUris {
    pub fn new(override_uri: impl Into<String>, base_uri: impl Into<String>) -> Self {
        Self {
            override_uri: override_uri.into(),
            base_uri: base_uri.into(),
        }
    }

    /// Join a relative path onto the base URI of a layer
    pub fn join(&self, tier: Tier, relative: &str) -> String {
        let root = match tier {
            Tier::Override => &self.override_uri,
            Tier::Base => &self.base_uri,
        };
        format!(
            "{}/{}",
            root.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}
