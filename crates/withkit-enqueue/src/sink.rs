//! Host registration interface

use serde::Serialize;
use withkit_asset::Version;

/// Stylesheet attached to a single block type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStyleAsset {
    pub handle: String,
    pub uri: String,
    pub version: Version,
}

/// A pattern category shown in the inserter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCategory {
    pub label: String,
    pub description: String,
}

/// A named style variation of a block type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStyleVariation {
    pub name: String,
    pub label: String,
    pub style_handle: String,
}

/// The host's style/script queue and block registries.
///
/// Every call is fire-and-forget: the host reports nothing back, and a call
/// the host cannot honour simply has no visible effect.
pub trait EnqueueSink {
    fn register_style(&mut self, handle: &str, uri: &str, dependencies: &[String], version: &Version);

    fn register_script(
        &mut self,
        handle: &str,
        uri: &str,
        dependencies: &[String],
        version: &Version,
        in_footer: bool,
    );

    fn register_block_style_variant(&mut self, block_name: &str, asset: BlockStyleAsset);

    fn register_pattern_category(&mut self, slug: &str, category: PatternCategory);

    fn register_block_style(&mut self, block_type: &str, variation: BlockStyleVariation);
}

/// One recorded host call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum EnqueueCall {
    Style {
        handle: String,
        uri: String,
        dependencies: Vec<String>,
        version: Version,
    },
    Script {
        handle: String,
        uri: String,
        dependencies: Vec<String>,
        version: Version,
        in_footer: bool,
    },
    BlockStyleVariant {
        block_name: String,
        #[serde(flatten)]
        asset: BlockStyleAsset,
    },
    PatternCategory {
        slug: String,
        #[serde(flatten)]
        category: PatternCategory,
    },
    BlockStyle {
        block_type: String,
        #[serde(flatten)]
        variation: BlockStyleVariation,
    },
}

impl EnqueueCall {
    /// Handle or slug the call registers
    pub fn key(&self) -> &str {
        match self {
            EnqueueCall::Style { handle, .. } | EnqueueCall::Script { handle, .. } => handle,
            EnqueueCall::BlockStyleVariant { asset, .. } => &asset.handle,
            EnqueueCall::PatternCategory { slug, .. } => slug,
            EnqueueCall::BlockStyle { variation, .. } => &variation.style_handle,
        }
    }
}

/// Sink that records calls in order, for tests and dry runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<EnqueueCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of all recorded calls, in call order
    pub fn keys(&self) -> Vec<&str> {
        self.calls.iter().map(EnqueueCall::key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl EnqueueSink for RecordingSink {
    fn register_style(&mut self, handle: &str, uri: &str, dependencies: &[String], version: &Version) {
        self.calls.push(EnqueueCall::Style {
            handle: handle.to_string(),
            uri: uri.to_string(),
            dependencies: dependencies.to_vec(),
            version: version.clone(),
        });
    }

    fn register_script(
        &mut self,
        handle: &str,
        uri: &str,
        dependencies: &[String],
        version: &Version,
        in_footer: bool,
    ) {
        self.calls.push(EnqueueCall::Script {
            handle: handle.to_string(),
            uri: uri.to_string(),
            dependencies: dependencies.to_vec(),
            version: version.clone(),
            in_footer,
        });
    }

    fn register_block_style_variant(&mut self, block_name: &str, asset: BlockStyleAsset) {
        self.calls.push(EnqueueCall::BlockStyleVariant {
            block_name: block_name.to_string(),
            asset,
        });
    }

    fn register_pattern_category(&mut self, slug: &str, category: PatternCategory) {
        self.calls.push(EnqueueCall::PatternCategory {
            slug: slug.to_string(),
            category,
        });
    }

    fn register_block_style(&mut self, block_type: &str, variation: BlockStyleVariation) {
        self.calls.push(EnqueueCall::BlockStyle {
            block_type: block_type.to_string(),
            variation,
        });
    }
}
