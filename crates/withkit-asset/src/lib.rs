//! WithKit Asset - Child-over-parent asset resolution
//!
//! This crate decides which theme layer supplies a compiled asset, reads the
//! `.asset.toml` manifest that sits next to it, and falls back to filesystem
//! timestamps when no usable manifest exists.

mod manifest;
mod resolver;
mod store;
mod types;

pub use manifest::{manifest_path_for, Manifest, MANIFEST_SUFFIX};
pub use resolver::ManifestResolver;
pub use store::{FsStore, MemoryStore, OverridableStore};
pub use types::{ResolvedAsset, ThemeUris, Version};
pub use withkit_core::Tier;
