//! Per-phase asset registration

use crate::block::{parse_block_filename, BlockName};
use crate::context::{HookPhase, RequestContext};
use crate::groups::{AssetGroup, AssetKind};
use crate::sink::{BlockStyleAsset, BlockStyleVariation, EnqueueSink, PatternCategory};
use std::path::PathBuf;
use tracing::{debug, warn};
use withkit_asset::{ManifestResolver, OverridableStore, ThemeUris, Version};
use withkit_core::{BlockStyleConfig, PatternCategoryConfig, ThemeConfig, Tier};

/// Flat directory of `namespace-block.css` files
const BLOCKS_DIR: &str = "build/css/blocks";
/// One folder per variation name, holding `namespace-block.css` files
const BLOCK_STYLES_DIR: &str = "build/css/block-styles";

/// A per-block stylesheet that survived the child-over-parent merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBlockStyle {
    pub filename: String,
    pub block: BlockName,
    pub tier: Tier,
    pub path: PathBuf,
}

/// Registers theme assets for one request.
///
/// Holds the fixed groups and configured registrations; the filesystem is
/// consulted afresh on every phase.
pub struct Registrar<S> {
    resolver: ManifestResolver<S>,
    uris: ThemeUris,
    slug: String,
    groups: Vec<AssetGroup>,
    pattern_categories: Vec<PatternCategoryConfig>,
    block_styles: Vec<BlockStyleConfig>,
}

impl<S: OverridableStore> Registrar<S> {
    /// Create a registrar with the fixed asset groups for `slug`
    pub fn new(store: S, uris: ThemeUris, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            resolver: ManifestResolver::new(store),
            uris,
            groups: AssetGroup::fixed(&slug),
            slug,
            pattern_categories: Vec::new(),
            block_styles: Vec::new(),
        }
    }

    /// Create a registrar from a loaded `theme.toml`
    pub fn from_config(store: S, config: &ThemeConfig) -> Self {
        let uris = ThemeUris::new(&config.theme.override_uri, &config.theme.base_uri);
        Self::new(store, uris, &config.theme.slug)
            .with_pattern_categories(config.pattern_categories.clone())
            .with_block_styles(config.block_styles.clone())
    }

    pub fn with_pattern_categories(mut self, categories: Vec<PatternCategoryConfig>) -> Self {
        self.pattern_categories = categories;
        self
    }

    pub fn with_block_styles(mut self, styles: Vec<BlockStyleConfig>) -> Self {
        self.block_styles = styles;
        self
    }

    pub fn groups(&self) -> &[AssetGroup] {
        &self.groups
    }

    pub fn resolver(&self) -> &ManifestResolver<S> {
        &self.resolver
    }

    /// Run the registrations attached to one hook phase
    pub fn run_phase(&self, phase: HookPhase, ctx: &RequestContext, sink: &mut dyn EnqueueSink) {
        debug!(%phase, ?ctx, "running registration phase");
        match phase {
            HookPhase::Init => {
                self.register_pattern_categories(sink);
                self.register_block_styles(sink);
                self.register_variation_stylesheets(sink);
                self.register_variations(sink);
            }
            HookPhase::FrontendAssets | HookPhase::EditorAssets | HookPhase::BlockAssets => {
                self.register_groups(phase, ctx, sink)
            }
        }
    }

    /// Run every phase in host order
    pub fn run_all(&self, ctx: &RequestContext, sink: &mut dyn EnqueueSink) {
        for phase in HookPhase::ALL {
            self.run_phase(phase, ctx, sink);
        }
    }

    fn register_groups(&self, phase: HookPhase, ctx: &RequestContext, sink: &mut dyn EnqueueSink) {
        for group in &self.groups {
            if group.context.phase() != phase {
                continue;
            }
            if !group.context.active_in(ctx) {
                debug!(group = %group.name, "group inactive for request");
                continue;
            }
            for item in &group.items {
                let resolved = self.resolver.resolve(&item.relative);
                let uri = self.resolver.uri(&item.relative, &self.uris);
                match item.kind {
                    AssetKind::Style => sink.register_style(
                        &item.handle,
                        &uri,
                        &resolved.dependencies,
                        &resolved.version,
                    ),
                    AssetKind::Script => sink.register_script(
                        &item.handle,
                        &uri,
                        &resolved.dependencies,
                        &resolved.version,
                        true,
                    ),
                }
            }
        }
    }

    /// Per-block stylesheets from both tiers, child files replacing parent
    /// files of the same name.
    ///
    /// Files whose names do not encode a block name are skipped with a warning.
    pub fn discover_block_styles(&self) -> Vec<DiscoveredBlockStyle> {
        self.resolver
            .store()
            .overlay_listing(BLOCKS_DIR, "css")
            .into_iter()
            .filter_map(|(filename, (tier, path))| match parse_block_filename(&filename) {
                Ok(block) => Some(DiscoveredBlockStyle {
                    filename,
                    block,
                    tier,
                    path,
                }),
                Err(e) => {
                    warn!(path = %path.display(), "skipping block stylesheet: {}", e);
                    None
                }
            })
            .collect()
    }

    fn register_block_styles(&self, sink: &mut dyn EnqueueSink) {
        for style in self.discover_block_styles() {
            let relative = format!("{}/{}", BLOCKS_DIR, style.filename);
            let version = self
                .resolver
                .store()
                .modified(&style.path)
                .map(Version::Modified)
                .unwrap_or(Version::Unversioned);

            sink.register_block_style_variant(
                &style.block.to_string(),
                BlockStyleAsset {
                    handle: format!("{}-{}-style", self.slug, style.filename),
                    uri: self.resolver.uri(&relative, &self.uris),
                    version,
                },
            );
        }
    }

    fn variation_handle(&self, block_stem: &str, variation: &str) -> String {
        format!("{}-block-style-{}-{}", self.slug, block_stem, variation)
    }

    fn register_variation_stylesheets(&self, sink: &mut dyn EnqueueSink) {
        let store = self.resolver.store();
        for variation in store.overlay_dirs(BLOCK_STYLES_DIR) {
            let dir = format!("{}/{}", BLOCK_STYLES_DIR, variation);
            for filename in store.overlay_listing(&dir, "css").into_keys() {
                let stem = filename.trim_end_matches(".css");
                let relative = format!("{}/{}", dir, filename);
                let resolved = self.resolver.resolve(&relative);
                sink.register_style(
                    &self.variation_handle(stem, &variation),
                    &self.resolver.uri(&relative, &self.uris),
                    &resolved.dependencies,
                    &resolved.version,
                );
            }
        }
    }

    fn register_variations(&self, sink: &mut dyn EnqueueSink) {
        for style in &self.block_styles {
            let style_handle = self.variation_handle(&style.block.replace('/', "-"), &style.name);
            sink.register_block_style(
                &style.block,
                BlockStyleVariation {
                    name: style.name.clone(),
                    label: style.label.clone(),
                    style_handle,
                },
            );
        }
    }

    fn register_pattern_categories(&self, sink: &mut dyn EnqueueSink) {
        for category in &self.pattern_categories {
            sink.register_pattern_category(
                &category.slug,
                PatternCategory {
                    label: category.label.clone(),
                    description: category.description.clone(),
                },
            );
        }
    }
}
