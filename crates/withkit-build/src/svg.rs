//! SVG minification
//!
//! A fixed set of passes over the document text:
//! - drop `width`/`height` on the root element once a `viewBox` is present
//!   or derivable
//! - drop `<title>` and `<desc>`
//! - drop `<defs>` children nothing can reference, then empty `<defs>`
//! - drop the root `xmlns` declaration
//! - collapse whitespace between tags

use crate::transform::{Transform, TransformError};
use regex::{Captures, Regex};
use std::sync::OnceLock;

struct Patterns {
    root: Regex,
    dimension: Regex,
    view_box: Regex,
    xmlns: Regex,
    metadata: Regex,
    defs: Regex,
    tag: Regex,
    id_attr: Regex,
    between_tags: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |p: &str| Regex::new(p).expect("static svg pattern");
        Patterns {
            root: re(r"<svg\b[^>]*>"),
            dimension: re(r#"\s(width|height)\s*=\s*["']([^"']*)["']"#),
            view_box: re(r"\sviewBox\s*="),
            xmlns: re(r#"\sxmlns\s*=\s*["'][^"']*["']"#),
            metadata: re(r"(?s)<(title|desc)\b[^>]*/>|<title\b[^>]*>.*?</title\s*>|<desc\b[^>]*>.*?</desc\s*>"),
            defs: re(r"(?s)<defs\b[^>]*/>|<defs\b([^>]*)>(.*?)</defs\s*>"),
            tag: re(r"<(/?)([A-Za-z][\w:.-]*)([^>]*?)(/?)>"),
            id_attr: re(r"\sid\s*="),
            between_tags: re(r">\s+<"),
        }
    })
}

/// Plain numeric length such as `24` or `24px`
fn parse_length(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse().ok()
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Drop the root dimensions when a `viewBox` exists or can be derived from
/// them; otherwise they are the only sizing the document has and stay
fn rewrite_root(tag: &str) -> String {
    let p = patterns();
    let tag = p.xmlns.replace_all(tag, "");
    if p.view_box.is_match(&tag) {
        return p.dimension.replace_all(&tag, "").into_owned();
    }

    let mut width = None;
    let mut height = None;
    for caps in p.dimension.captures_iter(&tag) {
        let value = parse_length(&caps[2]);
        match &caps[1] {
            "width" => width = value,
            _ => height = value,
        }
    }
    let (Some(w), Some(h)) = (width, height) else {
        return tag.into_owned();
    };

    let mut out = p.dimension.replace_all(&tag, "").into_owned();
    out.insert_str(
        "<svg".len(),
        &format!(r#" viewBox="0 0 {} {}""#, format_number(w), format_number(h)),
    );
    out
}

/// Keep the top-level children of a `<defs>` body that can still be used:
/// `<style>` sheets, and elements that carry an `id` themselves or wrap one
/// that does
fn prune_defs_body(body: &str) -> String {
    let p = patterns();
    let mut kept = String::new();
    let mut depth = 0usize;
    let mut child_start = 0usize;
    let mut keep_child = false;

    for caps in p.tag.captures_iter(body) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or_default();
        let closing = !caps[1].is_empty();
        let self_closing = !caps[4].is_empty();

        if closing {
            depth = depth.saturating_sub(1);
            if depth == 0 && keep_child {
                kept.push_str(&body[child_start..whole.1]);
            }
            continue;
        }

        let has_id = p.id_attr.is_match(&caps[3]);
        if depth == 0 {
            child_start = whole.0;
            keep_child = has_id || caps[2].eq_ignore_ascii_case("style");
            if self_closing {
                if keep_child {
                    kept.push_str(&body[child_start..whole.1]);
                }
                continue;
            }
        } else if has_id {
            keep_child = true;
        }
        if !self_closing {
            depth += 1;
        }
    }
    kept
}

fn prune_defs(doc: &str) -> String {
    patterns()
        .defs
        .replace_all(doc, |caps: &Captures| match caps.get(2) {
            None => String::new(),
            Some(body) => {
                let kept = prune_defs_body(body.as_str());
                if kept.trim().is_empty() {
                    String::new()
                } else {
                    format!("<defs{}>{}</defs>", &caps[1], kept)
                }
            }
        })
        .into_owned()
}

/// Minify an SVG document
pub fn minify(svg: &str) -> Result<String, TransformError> {
    let p = patterns();
    let root = p
        .root
        .find(svg)
        .ok_or_else(|| TransformError::InvalidSvg("no <svg> root element".to_string()))?;

    let mut doc = String::with_capacity(svg.len());
    doc.push_str(&svg[..root.start()]);
    doc.push_str(&rewrite_root(root.as_str()));
    doc.push_str(&svg[root.end()..]);

    let doc = p.metadata.replace_all(&doc, "");
    let doc = prune_defs(&doc);
    let doc = p.between_tags.replace_all(&doc, "><");
    Ok(doc.trim().to_string())
}

/// [`Transform`] wrapper around [`minify`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgMinify;

impl Transform for SvgMinify {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn apply(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        let text = std::str::from_utf8(input)
            .map_err(|e| TransformError::InvalidSvg(format!("not UTF-8: {}", e)))?;
        Ok(minify(text)?.into_bytes())
    }
}
