//! Fixed logical asset groups

use crate::context::{HookPhase, RequestContext};
use serde::Serialize;

/// Where an asset group is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadContext {
    Frontend,
    Editor,
    Both,
}

impl LoadContext {
    /// The hook phase that registers groups of this context
    pub fn phase(self) -> HookPhase {
        match self {
            LoadContext::Frontend => HookPhase::FrontendAssets,
            LoadContext::Editor => HookPhase::EditorAssets,
            LoadContext::Both => HookPhase::BlockAssets,
        }
    }

    /// Whether a group of this context loads for the request
    pub fn active_in(self, ctx: &RequestContext) -> bool {
        match self {
            LoadContext::Frontend => !ctx.is_admin,
            LoadContext::Editor => ctx.is_block_editor,
            LoadContext::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Style,
    /// Scripts are always printed in the footer
    Script,
}

/// One file in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupItem {
    pub kind: AssetKind,
    /// Path relative to the theme root
    pub relative: String,
    pub handle: String,
}

/// A named bundle of files registered together under one load context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetGroup {
    pub name: String,
    pub context: LoadContext,
    pub items: Vec<GroupItem>,
}

impl AssetGroup {
    /// The global, screen and editor groups for a theme slug
    pub fn fixed(slug: &str) -> Vec<AssetGroup> {
        let item = |kind, relative: &str, suffix: &str| GroupItem {
            kind,
            relative: relative.to_string(),
            handle: format!("{}-{}", slug, suffix),
        };
        vec![
            AssetGroup {
                name: "global".into(),
                context: LoadContext::Both,
                items: vec![
                    item(AssetKind::Style, "build/css/global.css", "global-style"),
                    item(AssetKind::Script, "build/js/global.js", "global-script"),
                ],
            },
            AssetGroup {
                name: "screen".into(),
                context: LoadContext::Frontend,
                items: vec![item(AssetKind::Style, "build/css/screen.css", "screen-style")],
            },
            AssetGroup {
                name: "editor".into(),
                context: LoadContext::Editor,
                items: vec![item(AssetKind::Style, "build/css/editor.css", "editor-style")],
            },
        ]
    }
}
