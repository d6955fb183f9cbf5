//! Request phases and load context

use serde::Serialize;
use std::fmt;

/// Host lifecycle points the registrar attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Initialization: block styles, variations, pattern categories
    Init,
    /// Public-facing asset phase
    FrontendAssets,
    /// Block editor asset phase
    EditorAssets,
    /// Asset phase shared by the frontend and the editor
    BlockAssets,
}

impl HookPhase {
    /// All phases in the order the host fires them
    pub const ALL: [HookPhase; 4] = [
        HookPhase::Init,
        HookPhase::BlockAssets,
        HookPhase::FrontendAssets,
        HookPhase::EditorAssets,
    ];
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Init => write!(f, "init"),
            HookPhase::FrontendAssets => write!(f, "frontend_assets"),
            HookPhase::EditorAssets => write!(f, "editor_assets"),
            HookPhase::BlockAssets => write!(f, "block_assets"),
        }
    }
}

/// What kind of request is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    /// Any admin screen, including the editor
    pub is_admin: bool,
    /// The block editor specifically
    pub is_block_editor: bool,
}

impl RequestContext {
    /// A public page render
    pub fn frontend() -> Self {
        Self::default()
    }

    /// A block editor screen
    pub fn block_editor() -> Self {
        Self {
            is_admin: true,
            is_block_editor: true,
        }
    }
}
