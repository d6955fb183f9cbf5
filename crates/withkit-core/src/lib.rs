//! WithKit Core - Foundational types for the WithKit theme toolchain
//!
//! This crate provides the types that all other WithKit crates depend on:
//! - `ContentHash` - SHA-256 based content hashing for bundle versions
//! - `Tier` - Which theme layer supplied a file
//! - `ThemeConfig` - Layered `theme.toml` configuration
//! - Error types and Result alias

mod config;
mod error;
mod hash;
mod tier;

pub use config::{
    BlockStyleConfig, BuildMode, BuildSection, PatternCategoryConfig, ThemeConfig, ThemeSection,
    CONFIG_FILE,
};
pub use error::{Result, ThemeError};
pub use hash::ContentHash;
pub use tier::Tier;
