//! WithKit Build - Offline asset pipeline
//!
//! Discovers stylesheet and script entry points under the theme's source
//! tree, compiles them into `build/` with an `.asset.toml` manifest per
//! bundle, runs the production-only image and SVG transforms, and stamps the
//! theme version into the stylesheet header.

pub mod compile;
pub mod discover;
pub mod jobs;
pub mod pipeline;
pub mod stamp;
pub mod svg;
pub mod transform;

pub use compile::{extract_script_dependencies, CompiledBundle, Compiler, ScriptCompiler, ScssCompiler};
pub use discover::{recursive_entries, scss_files, style_block_entries, theme_entries, BuildEntry, EntryMap};
pub use jobs::{plan_jobs, run_jobs, TransformJob, TransformReport};
pub use pipeline::{BuildReport, Pipeline};
pub use stamp::{stamp_version, StampOutcome};
pub use svg::SvgMinify;
pub use transform::{RasterEncoding, RasterTransform, Transform, TransformError, WebpCopyTransform};
