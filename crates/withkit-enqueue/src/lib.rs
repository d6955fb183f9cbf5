//! WithKit Enqueue - Asset registration against the host
//!
//! Walks the fixed asset groups and the per-block stylesheet directories,
//! resolves each file through [`withkit_asset::ManifestResolver`], and issues
//! registration calls on an injected [`EnqueueSink`].

mod block;
mod context;
mod groups;
mod registrar;
mod sink;

pub use block::{parse_block_filename, BlockName, InvalidBlockFilename};
pub use context::{HookPhase, RequestContext};
pub use groups::{AssetGroup, AssetKind, GroupItem, LoadContext};
pub use registrar::{DiscoveredBlockStyle, Registrar};
pub use sink::{
    BlockStyleAsset, BlockStyleVariation, EnqueueCall, EnqueueSink, PatternCategory,
    RecordingSink,
};
