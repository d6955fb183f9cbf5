//! Production transform jobs
//!
//! Every source image yields two jobs (re-encode in place, WebP copy) and
//! every SVG yields one minify job. Jobs run on the rayon pool; a failed job
//! is logged and reported but never stops its siblings. An AVIF the codecs
//! cannot decode is copied as-is and only loses its WebP copy.

use crate::svg::SvgMinify;
use crate::transform::{RasterTransform, Transform, TransformError, WebpCopyTransform};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use withkit_core::Result;

/// Raster extensions picked up under `images/`
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "avif", "webp"];

/// One source file, one transform, one destination
#[derive(Clone)]
pub struct TransformJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub transform: Arc<dyn Transform>,
}

impl fmt::Debug for TransformJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformJob")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("transform", &self.transform.name())
            .finish()
    }
}

impl TransformJob {
    fn execute(&self) -> std::result::Result<(), TransformError> {
        let input = fs::read(&self.source)?;
        let output = self.transform.apply(&input)?;
        if let Some(parent) = self.destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.destination, output)?;
        Ok(())
    }
}

/// Outcome of a batch of transform jobs
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransformReport {
    /// Destinations written
    pub emitted: Vec<PathBuf>,
    /// Sources whose job failed
    pub failed: Vec<PathBuf>,
}

impl TransformReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Files under `dir` (recursively) whose lowercased extension is accepted,
/// as paths relative to `dir`, sorted
fn walk(dir: &Path, accept: &dyn Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !dir.is_dir() {
        return Ok(found);
    }
    let mut pending = vec![PathBuf::new()];
    while let Some(relative) = pending.pop() {
        for entry in fs::read_dir(dir.join(&relative))? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let child = relative.join(entry.file_name());
            if file_type.is_dir() {
                pending.push(child);
            } else if file_type.is_file() {
                let ext = child
                    .extension()
                    .map(|e| e.to_string_lossy().to_ascii_lowercase())
                    .unwrap_or_default();
                if accept(&ext) {
                    found.push(child);
                }
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Plan the transform jobs for `source_root`, writing under `output_root`.
///
/// - `images/[path][name][ext]` re-encoded in its own format
/// - `webp/[path][name].webp` for every image
/// - `svg/[path][name].svg` minified
///
/// Missing `images/` or `svg/` directories plan nothing.
pub fn plan_jobs(source_root: &Path, output_root: &Path) -> Result<Vec<TransformJob>> {
    let mut jobs = Vec::new();
    let webp: Arc<dyn Transform> = Arc::new(WebpCopyTransform::default());

    let images = source_root.join("images");
    for relative in walk(&images, &|ext: &str| IMAGE_EXTENSIONS.contains(&ext))? {
        let ext = relative
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = images.join(&relative);
        jobs.push(TransformJob {
            source: source.clone(),
            destination: output_root.join("images").join(&relative),
            transform: Arc::new(RasterTransform::for_extension(&ext)),
        });
        jobs.push(TransformJob {
            source,
            destination: output_root.join("webp").join(relative.with_extension("webp")),
            transform: Arc::clone(&webp),
        });
    }

    let svg_root = source_root.join("svg");
    let svg: Arc<dyn Transform> = Arc::new(SvgMinify);
    for relative in walk(&svg_root, &|ext: &str| ext == "svg")? {
        jobs.push(TransformJob {
            source: svg_root.join(&relative),
            destination: output_root.join("svg").join(&relative),
            transform: Arc::clone(&svg),
        });
    }

    debug!(count = jobs.len(), "planned transform jobs");
    Ok(jobs)
}

/// Run jobs in parallel; failures are logged and collected, never fatal
pub fn run_jobs(jobs: &[TransformJob]) -> TransformReport {
    let results: Vec<(&TransformJob, std::result::Result<(), TransformError>)> =
        jobs.par_iter().map(|job| (job, job.execute())).collect();

    let mut report = TransformReport::default();
    for (job, result) in results {
        match result {
            Ok(()) => report.emitted.push(job.destination.clone()),
            Err(e) => {
                warn!(
                    source = %job.source.display(),
                    transform = job.transform.name(),
                    error = %e,
                    "transform failed, skipping"
                );
                report.failed.push(job.source.clone());
            }
        }
    }
    report
}
