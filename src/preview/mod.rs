//! Dry-run reporting.
//!
//! Runs the same filter + matcher pipeline as the move path but never
//! moves anything, producing a per-file decision with a human-readable
//! block reason and a batch summary for the preview dialog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::MoveEngine;
use crate::models::FileMetadata;
use crate::rules::criteria::{self, FilterVerdict};
use crate::rules::FilterMode;

/// Why a file would or would not move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "details")]
pub enum PreviewStatus {
    /// Excluded by the filter before rule matching
    BlockedByFilter { reason: String },
    /// A rule matched but the file already sits in its destination
    AlreadyInPlace { destination: String },
    /// A rule matched and the file would be relocated
    WillMove { destination: String },
    /// No rule matched; the file is left alone
    NoRuleMatched,
}

/// Per-file projection of the matching pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    pub file_path: String,
    #[serde(flatten)]
    pub status: PreviewStatus,
    /// Winning rule identifier, when one matched
    pub matched_rule: Option<String>,
}

/// Batch summary for the preview dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePreview {
    pub entries: Vec<PreviewEntry>,
    pub total: usize,
    pub move_count: usize,
    /// Paths of the files that would actually move
    pub files_to_move: Vec<String>,
}

/// Preview a batch of files against the engine's rule set.
///
/// `filter_mode` is explicit here: the move path is always blacklist, but
/// previews may exercise whitelist semantics.
pub fn preview_files(
    engine: &MoveEngine,
    files: &[FileMetadata],
    filter_mode: FilterMode,
) -> MovePreview {
    preview_files_at(engine, files, filter_mode, Utc::now())
}

/// [`preview_files`] with an injected clock.
pub fn preview_files_at(
    engine: &MoveEngine,
    files: &[FileMetadata],
    filter_mode: FilterMode,
    now: DateTime<Utc>,
) -> MovePreview {
    let mut preview = MovePreview {
        total: files.len(),
        ..MovePreview::default()
    };

    for metadata in files {
        let entry = preview_one(engine, metadata, filter_mode, now);
        if let PreviewStatus::WillMove { .. } = entry.status {
            preview.move_count += 1;
            preview.files_to_move.push(entry.file_path.clone());
        }
        preview.entries.push(entry);
    }

    tracing::debug!(
        total = preview.total,
        move_count = preview.move_count,
        "preview complete"
    );
    preview
}

fn preview_one(
    engine: &MoveEngine,
    metadata: &FileMetadata,
    filter_mode: FilterMode,
    now: DateTime<Utc>,
) -> PreviewEntry {
    let filters = &engine.rule_set().filters;
    if let FilterVerdict::Blocked { reason } =
        criteria::evaluate_filter(metadata, filters, filter_mode)
    {
        return PreviewEntry {
            file_path: metadata.file_path.clone(),
            status: PreviewStatus::BlockedByFilter { reason },
            matched_rule: None,
        };
    }

    let Some((matched_rule, raw_destination)) = engine.select_destination(metadata, now) else {
        return PreviewEntry {
            file_path: metadata.file_path.clone(),
            status: PreviewStatus::NoRuleMatched,
            matched_rule: None,
        };
    };

    let destination = engine.resolve_destination(metadata, &raw_destination);
    let status = if same_folder(metadata.folder(), &destination) {
        PreviewStatus::AlreadyInPlace { destination }
    } else {
        PreviewStatus::WillMove { destination }
    };

    PreviewEntry {
        file_path: metadata.file_path.clone(),
        status,
        matched_rule: Some(matched_rule),
    }
}

/// Destinations may carry a leading slash while metadata folders never do.
fn same_folder(current: &str, destination: &str) -> bool {
    current.trim_matches('/') == destination.trim_matches('/')
}
