//! Post-build version stamping of the theme stylesheet header

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};
use withkit_core::Result;

/// What [`stamp_version`] did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// The file does not exist
    Missing,
    /// No `Version:` line; the file was left untouched
    NoVersionLine,
    /// The first `Version:` line now carries the new version
    Stamped,
}

fn version_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(Version:\s*)([^\r\n]+)").expect("static version pattern"))
}

/// Replace the value of the first `Version:` line in `path` with `version`
pub fn stamp_version(path: &Path, version: &str) -> Result<StampOutcome> {
    if !path.is_file() {
        warn!(file = %path.display(), "stamp file missing");
        return Ok(StampOutcome::Missing);
    }
    let content = std::fs::read_to_string(path)?;
    if !version_line().is_match(&content) {
        warn!(file = %path.display(), "no Version: line to stamp");
        return Ok(StampOutcome::NoVersionLine);
    }

    let stamped = version_line().replace(&content, |caps: &Captures| format!("{}{}", &caps[1], version));
    std::fs::write(path, stamped.as_bytes())?;
    info!(file = %path.display(), version, "stamped version");
    Ok(StampOutcome::Stamped)
}
