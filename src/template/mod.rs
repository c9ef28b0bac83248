//! Destination template resolution.
//!
//! A chosen destination may contain `{{property}}`, `{{property|default}}`,
//! and `{{tag:name}}` placeholders that are resolved against the note's
//! metadata at move time. Resolved values are reduced to their deepest
//! `/`-segment and sanitized into safe path segments; the final path is
//! cleaned and validated. Resolution never fails: problems surface as
//! warning/error strings and the best-effort path is still returned.

use serde::{Deserialize, Serialize};

use crate::models::FileMetadata;
use crate::rules::regex_cache;

/// Result of rendering a destination template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPath {
    /// Best-effort cleaned path, returned even when errors were recorded
    pub path: String,
    /// Non-fatal issues, e.g. a placeholder without a resolvable value
    pub warnings: Vec<String>,
    /// Structural problems the caller should surface before moving
    pub errors: Vec<String>,
}

const PLACEHOLDER_PATTERN: &str = r"\{\{([^{}]+)\}\}";

/// Stands in for a placeholder that resolved to nothing until the
/// empty-segment validation has run; sanitization already strips control
/// characters, so resolved values can never contain it.
const MISSING_MARKER: char = '\u{0}';

/// Resolve all placeholders in `template` against `metadata`, then clean
/// and validate the resulting path.
///
/// Warnings for unresolvable placeholders are only recorded when
/// `emit_warnings` is set (previews render quietly).
pub fn render_with_validation(
    template: &str,
    metadata: &FileMetadata,
    emit_warnings: bool,
) -> RenderedPath {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    // Substitute over the whole template first: placeholder names may
    // contain `/` (hierarchical tags), so splitting the template before
    // substitution would cut a placeholder across segments. A placeholder
    // that resolves to nothing leaves a marker so the empty-segment check
    // below can still tell "became empty" from "was empty in the template".
    let substituted = match regex_cache::compile(PLACEHOLDER_PATTERN) {
        Some(re) => re
            .replace_all(template, |caps: &regex::Captures<'_>| {
                let value = resolve_placeholder(&caps[1], metadata, emit_warnings, &mut warnings);
                if value.is_empty() {
                    MISSING_MARKER.to_string()
                } else {
                    value
                }
            })
            .into_owned(),
        None => template.to_string(),
    };

    for segment in substituted.split('/') {
        if segment.contains(MISSING_MARKER) && segment.chars().all(|c| c == MISSING_MARKER) {
            errors.push(format!(
                "destination \"{template}\" has an empty segment (missing required value with no default)"
            ));
        }
    }
    let substituted: String = substituted.chars().filter(|c| *c != MISSING_MARKER).collect();

    let path = clean_path(&substituted);

    if path.split('/').any(|segment| segment == "..") {
        errors.push(format!("path traversal in destination \"{path}\""));
    }
    if is_drive_absolute(&path) {
        errors.push(format!("absolute drive path in destination \"{path}\""));
    }

    RenderedPath {
        path,
        warnings,
        errors,
    }
}

/// Collapse duplicate slashes, drop empty segments, and strip the trailing
/// slash. A leading `/` is preserved, and the root path `/` stays `/`.
/// Idempotent: cleaning a cleaned path changes nothing.
pub fn clean_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        return if absolute { "/".to_string() } else { String::new() };
    }
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn resolve_placeholder(
    inner: &str,
    metadata: &FileMetadata,
    emit_warnings: bool,
    warnings: &mut Vec<String>,
) -> String {
    let inner = inner.trim();
    let inner = inner.strip_prefix("getPropertyValue:").unwrap_or(inner).trim();

    let (name, default) = match inner.split_once('|') {
        Some((name, default)) => (name.trim(), Some(default.trim())),
        None => (inner, None),
    };

    let raw = match name.strip_prefix("tag:") {
        Some(tag_name) => resolve_tag(metadata, tag_name.trim()),
        None => resolve_property(metadata, name),
    };

    let mut value = sanitize_segment(deepest_segment(&raw));
    if value.is_empty() {
        if let Some(default) = default {
            value = sanitize_segment(default);
        }
    }
    if value.is_empty() && emit_warnings {
        warnings.push(format!("no value found for placeholder \"{{{{{name}}}}}\""));
    }
    value
}

/// Property values resolve to their first element when list-shaped,
/// otherwise the stringified scalar. Nested objects are not representable
/// in a path and resolve to empty.
fn resolve_property(metadata: &FileMetadata, name: &str) -> String {
    match metadata.properties.get(name) {
        Some(serde_json::Value::Array(items)) => {
            items.first().map(stringify_scalar).unwrap_or_default()
        }
        Some(value) => stringify_scalar(value),
        None => String::new(),
    }
}

/// Tag placeholders match a tag exactly or as a hierarchy prefix and keep
/// the deepest segment of the matched tag, so `{{tag:food}}` against
/// `#food/recipes` yields `recipes`.
fn resolve_tag(metadata: &FileMetadata, name: &str) -> String {
    let wanted = name.trim_start_matches('#');
    if wanted.is_empty() {
        return String::new();
    }

    let normalized: Vec<&str> = metadata
        .tags
        .iter()
        .map(|tag| tag.trim_start_matches('#'))
        .collect();

    let matched = normalized
        .iter()
        .find(|tag| **tag == wanted)
        .or_else(|| {
            normalized.iter().find(|tag| {
                tag.strip_prefix(wanted)
                    .is_some_and(|rest| rest.starts_with('/'))
            })
        });

    match matched {
        Some(tag) => deepest_segment(tag).to_string(),
        None => String::new(),
    }
}

fn stringify_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// `a/b/c` reduces to `c`; values without hierarchy pass through.
fn deepest_segment(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

/// Make a value safe as a single path segment: trim, collapse whitespace
/// runs to `_`, strip `<>:"|?*` and control characters, trim stray dots.
fn sanitize_segment(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped: String = collapsed
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*') && !c.is_control())
        .collect();
    stripped.trim_matches('.').to_string()
}

/// Windows drive-letter absolute paths (`C:/...`) must not escape the
/// vault.
fn is_drive_absolute(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
