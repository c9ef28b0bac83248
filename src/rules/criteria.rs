//! Generation-1 criterion matching.
//!
//! Criteria are raw strings of the form `"type: value"`, e.g.
//! `tag: #food/recipes`, `fileName: Daily*`, `path: Inbox`,
//! `property: status:done`. They are parsed lazily on every evaluation;
//! a malformed criterion never matches.

use crate::models::FileMetadata;
use crate::rules::{regex_cache, FilterMode, Rule};

/// Outcome of running a file through a filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
    /// The file may proceed to rule matching
    Pass,
    /// The file is excluded; `reason` is shown to the user in previews
    Blocked { reason: String },
}

impl FilterVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, FilterVerdict::Pass)
    }
}

/// Evaluate one `"type: value"` criterion against a metadata snapshot.
///
/// Unknown types and malformed strings evaluate to `false`.
pub fn evaluate_criteria(metadata: &FileMetadata, criterion: &str) -> bool {
    let Some((kind, value)) = parse_criterion(criterion) else {
        return false;
    };

    match kind {
        "tag" => matches_tag(&metadata.tags, value),
        "fileName" => matches_file_name(&metadata.file_name, value),
        "path" => matches_path(&metadata.file_path, value),
        "content" => metadata.file_content.contains(value),
        "created_at" => matches_date_prefix(metadata.created_at.as_ref(), value),
        "updated_at" => matches_date_prefix(metadata.updated_at.as_ref(), value),
        "property" => matches_property(metadata, value),
        _ => false,
    }
}

/// Run the filter list with an explicit polarity.
///
/// An empty filter always passes. Blacklist mode fails the file on the
/// first matching criterion; whitelist mode fails it on the first
/// non-matching one.
pub fn evaluate_filter(
    metadata: &FileMetadata,
    filters: &[String],
    mode: FilterMode,
) -> FilterVerdict {
    for criterion in filters {
        let matched = evaluate_criteria(metadata, criterion);
        match mode {
            FilterMode::Blacklist if matched => {
                return FilterVerdict::Blocked {
                    reason: format!("matched blacklist criterion \"{criterion}\""),
                };
            }
            FilterMode::Whitelist if !matched => {
                return FilterVerdict::Blocked {
                    reason: format!("not in whitelist (failed \"{criterion}\")"),
                };
            }
            _ => {}
        }
    }
    FilterVerdict::Pass
}

/// Find the first rule whose criterion matches, in stored order.
///
/// Matching rules are keyed by `(original_index, specificity)` and sorted
/// ascending by index, then descending by tag hierarchy depth. Indices are
/// unique, so the specificity term cannot currently change the outcome; it
/// is kept for rule sets that may one day share a priority bucket.
pub fn find_matching_rule<'a>(metadata: &FileMetadata, rules: &'a [Rule]) -> Option<&'a Rule> {
    let mut matches: Vec<(usize, usize)> = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| evaluate_criteria(metadata, &rule.criteria))
        .map(|(index, rule)| (index, specificity(&rule.criteria)))
        .collect();

    matches.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    matches.first().map(|&(index, _)| &rules[index])
}

/// Hierarchy depth of a `tag:` criterion, 0 for every other type.
fn specificity(criterion: &str) -> usize {
    match parse_criterion(criterion) {
        Some(("tag", value)) => value.split('/').count(),
        _ => 0,
    }
}

fn parse_criterion(criterion: &str) -> Option<(&str, &str)> {
    let (kind, value) = criterion.split_once(':')?;
    let kind = kind.trim();
    let value = value.trim();
    if kind.is_empty() || value.is_empty() {
        return None;
    }
    Some((kind, value))
}

/// Hierarchical tag match: `#food` matches `#food` and `#food/recipes`,
/// but never an unrelated prefix like `#foods`.
fn matches_tag(tags: &[String], value: &str) -> bool {
    let wanted = value.trim_start_matches('#');
    if wanted.is_empty() {
        return false;
    }
    tags.iter().any(|tag| {
        let tag = tag.trim_start_matches('#');
        tag == wanted || tag.strip_prefix(wanted).is_some_and(|rest| rest.starts_with('/'))
    })
}

fn matches_file_name(file_name: &str, value: &str) -> bool {
    if value.contains('*') || value.contains('?') {
        return match regex_cache::compile(&glob_to_regex(value)) {
            Some(re) => re.is_match(file_name),
            None => false,
        };
    }
    file_name == value || file_name.to_lowercase() == value.to_lowercase()
}

/// Translate a `*`/`?` glob into an anchored regex source, escaping every
/// other metacharacter in the literal portions.
fn glob_to_regex(glob: &str) -> String {
    let mut source = String::with_capacity(glob.len() + 4);
    source.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    source
}

/// Exact full-path match, or folder-prefix match (`Inbox` blocks
/// `Inbox/note.md` but not `Inbox-old/note.md`).
fn matches_path(file_path: &str, value: &str) -> bool {
    let value = value.trim_end_matches('/');
    if value.is_empty() {
        return false;
    }
    file_path == value || file_path.starts_with(&format!("{value}/"))
}

/// Date criteria match on an ISO-8601 string prefix, so `2024-05` matches
/// any timestamp in that month. A missing timestamp never matches.
fn matches_date_prefix(date: Option<&chrono::DateTime<chrono::Utc>>, value: &str) -> bool {
    match date {
        Some(date) => date
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
            .starts_with(value),
        None => false,
    }
}

/// `property: K` — the key exists with a non-null value.
/// `property: K:V` — the stringified value (or any list element) equals `V`
/// case-insensitively.
fn matches_property(metadata: &FileMetadata, value: &str) -> bool {
    match value.split_once(':') {
        None => metadata
            .properties
            .get(value.trim())
            .is_some_and(|v| !v.is_null()),
        Some((key, wanted)) => {
            let wanted = wanted.trim();
            match metadata.properties.get(key.trim()) {
                Some(serde_json::Value::Array(items)) => items
                    .iter()
                    .any(|item| stringify(item).eq_ignore_ascii_case(wanted)),
                Some(scalar) => stringify(scalar).eq_ignore_ascii_case(wanted),
                None => false,
            }
        }
    }
}

fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tagged(tags: &[&str]) -> FileMetadata {
        FileMetadata {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..FileMetadata::new("note.md")
        }
    }

    #[test]
    fn test_tag_exact_match() {
        assert!(evaluate_criteria(&tagged(&["#work"]), "tag: #work"));
    }

    #[test]
    fn test_tag_hierarchy_match() {
        assert!(evaluate_criteria(&tagged(&["#food/recipes"]), "tag: #food"));
        assert!(evaluate_criteria(
            &tagged(&["#food/recipes/italian"]),
            "tag: #food/recipes"
        ));
    }

    #[test]
    fn test_tag_no_match_on_unrelated_prefix() {
        assert!(!evaluate_criteria(&tagged(&["#foods"]), "tag: #food"));
        assert!(!evaluate_criteria(&tagged(&["#work"]), "tag: #workplace"));
    }

    #[test]
    fn test_tag_without_hash_in_metadata() {
        assert!(evaluate_criteria(&tagged(&["food/recipes"]), "tag: #food"));
    }

    #[test]
    fn test_file_name_exact_and_case_insensitive() {
        let meta = FileMetadata::new("Notes/Readme.md");
        assert!(evaluate_criteria(&meta, "fileName: Readme.md"));
        assert!(evaluate_criteria(&meta, "fileName: readme.md"));
        assert!(!evaluate_criteria(&meta, "fileName: readme"));
    }

    #[test]
    fn test_file_name_case_fold_is_unicode_aware() {
        let meta = FileMetadata::new("überblick.md");
        assert!(evaluate_criteria(&meta, "fileName: Überblick.md"));
    }

    #[test]
    fn test_file_name_wildcard() {
        assert!(evaluate_criteria(
            &FileMetadata::new("Daily Test.md"),
            "fileName: Daily*"
        ));
        assert!(evaluate_criteria(
            &FileMetadata::new("daily notes.md"),
            "fileName: Daily*"
        ));
        assert!(!evaluate_criteria(
            &FileMetadata::new("predaily.md"),
            "fileName: Daily*"
        ));
    }

    #[test]
    fn test_file_name_question_mark_and_escaping() {
        assert!(evaluate_criteria(
            &FileMetadata::new("note1.md"),
            "fileName: note?.md"
        ));
        // The dot is a literal, not a regex any-char
        assert!(!evaluate_criteria(
            &FileMetadata::new("noteXamd"),
            "fileName: note?.md"
        ));
    }

    #[test]
    fn test_path_prefix_semantics() {
        let meta = FileMetadata::new("Inbox/2024/note.md");
        assert!(evaluate_criteria(&meta, "path: Inbox"));
        assert!(evaluate_criteria(&meta, "path: Inbox/2024"));
        assert!(evaluate_criteria(&meta, "path: Inbox/2024/note.md"));
        assert!(!evaluate_criteria(&meta, "path: Inb"));
    }

    #[test]
    fn test_content_substring() {
        let meta = FileMetadata {
            file_content: "status: draft\nbody text".to_string(),
            ..FileMetadata::new("note.md")
        };
        assert!(evaluate_criteria(&meta, "content: draft"));
        assert!(!evaluate_criteria(&meta, "content: final"));
    }

    #[test]
    fn test_date_prefix_match() {
        let meta = FileMetadata {
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()),
            ..FileMetadata::new("note.md")
        };
        assert!(evaluate_criteria(&meta, "created_at: 2024-05"));
        assert!(evaluate_criteria(&meta, "created_at: 2024-05-17"));
        assert!(!evaluate_criteria(&meta, "created_at: 2024-06"));
        assert!(!evaluate_criteria(&meta, "updated_at: 2024"));
    }

    #[test]
    fn test_property_presence_and_value() {
        let mut meta = FileMetadata::new("note.md");
        meta.properties
            .insert("status".into(), serde_json::json!("Done"));
        meta.properties.insert("draft".into(), serde_json::json!(null));
        meta.properties
            .insert("topics".into(), serde_json::json!(["Rust", "Notes"]));

        assert!(evaluate_criteria(&meta, "property: status"));
        assert!(!evaluate_criteria(&meta, "property: draft"));
        assert!(!evaluate_criteria(&meta, "property: missing"));
        assert!(evaluate_criteria(&meta, "property: status:done"));
        assert!(evaluate_criteria(&meta, "property: topics:rust"));
        assert!(!evaluate_criteria(&meta, "property: topics:python"));
    }

    #[test]
    fn test_malformed_criterion_never_matches() {
        let meta = FileMetadata::new("note.md");
        assert!(!evaluate_criteria(&meta, "no colon here"));
        assert!(!evaluate_criteria(&meta, "tag:"));
        assert!(!evaluate_criteria(&meta, "unknownType: x"));
    }

    #[test]
    fn test_empty_filter_passes() {
        let meta = tagged(&["#work"]);
        assert!(evaluate_filter(&meta, &[], FilterMode::Blacklist).is_pass());
        assert!(evaluate_filter(&meta, &[], FilterMode::Whitelist).is_pass());
    }

    #[test]
    fn test_blacklist_blocks_on_any_match() {
        let meta = tagged(&["#work"]);
        let filters = vec!["tag: #personal".to_string(), "tag: #work".to_string()];
        let verdict = evaluate_filter(&meta, &filters, FilterMode::Blacklist);
        assert_eq!(
            verdict,
            FilterVerdict::Blocked {
                reason: "matched blacklist criterion \"tag: #work\"".to_string()
            }
        );
    }

    #[test]
    fn test_whitelist_requires_all() {
        let meta = tagged(&["#work"]);
        let filters = vec!["tag: #work".to_string(), "tag: #urgent".to_string()];
        let verdict = evaluate_filter(&meta, &filters, FilterMode::Whitelist);
        assert!(matches!(verdict, FilterVerdict::Blocked { .. }));

        let both = tagged(&["#work", "#urgent"]);
        assert!(evaluate_filter(&both, &filters, FilterMode::Whitelist).is_pass());
    }

    #[test]
    fn test_first_rule_in_order_wins() {
        let meta = tagged(&["#food/recipes"]);
        let rules = vec![
            Rule {
                criteria: "tag: #food".to_string(),
                path: "broad".to_string(),
            },
            Rule {
                criteria: "tag: #food/recipes".to_string(),
                path: "specific".to_string(),
            },
        ];
        // The later rule is more specific but never preferred
        let rule = find_matching_rule(&meta, &rules).unwrap();
        assert_eq!(rule.path, "broad");
    }

    #[test]
    fn test_no_rule_matches() {
        let meta = tagged(&["#misc"]);
        let rules = vec![Rule {
            criteria: "tag: #food".to_string(),
            path: "food-folder".to_string(),
        }];
        assert!(find_matching_rule(&meta, &rules).is_none());
    }
}
