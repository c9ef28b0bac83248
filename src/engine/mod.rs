//! Rule selection entry point.
//!
//! [`MoveEngine`] takes an immutable [`RuleSet`] snapshot at construction
//! and decides, per file, whether it should move and where. The pipeline
//! is: blacklist filter → generation-appropriate matcher → optional
//! template resolution. A `None` destination means "skip this file"; the
//! engine never falls back to a default folder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FileMetadata;
use crate::rules::criteria::{self, FilterVerdict};
use crate::rules::{triggers, FilterMode, Generation, RuleSet};
use crate::template;

/// Outcome of evaluating one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDecision {
    /// Destination folder, or `None` to skip the file
    pub destination: Option<String>,
    /// Identifier of the winning rule: its name (generation 2) or its
    /// criterion string (generation 1)
    pub matched_rule: Option<String>,
    /// Template warnings to surface as notifications
    pub warnings: Vec<String>,
    /// Template errors to surface as notifications
    pub errors: Vec<String>,
}

impl MoveDecision {
    fn skip() -> Self {
        Self::default()
    }
}

/// Evaluates files against a fixed rule configuration.
///
/// The rule set is consumed at construction, so rules and filters cannot
/// change underneath a running batch.
#[derive(Debug, Clone)]
pub struct MoveEngine {
    rule_set: RuleSet,
}

impl MoveEngine {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Decide whether and where `metadata`'s file should move.
    pub fn decide(&self, metadata: &FileMetadata) -> MoveDecision {
        self.decide_at(metadata, Utc::now())
    }

    /// [`decide`](Self::decide) with an injected clock, for deterministic
    /// evaluation of relative date operators.
    pub fn decide_at(&self, metadata: &FileMetadata, now: DateTime<Utc>) -> MoveDecision {
        // The primary move path always applies the filter as a blacklist
        if let FilterVerdict::Blocked { reason } =
            criteria::evaluate_filter(metadata, &self.rule_set.filters, FilterMode::Blacklist)
        {
            tracing::debug!(file = %metadata.file_path, %reason, "file blocked by filter");
            return MoveDecision::skip();
        }

        let Some((matched_rule, destination)) = self.select_destination(metadata, now) else {
            tracing::trace!(file = %metadata.file_path, "no rule matched");
            return MoveDecision::skip();
        };
        tracing::debug!(
            file = %metadata.file_path,
            rule = %matched_rule,
            %destination,
            "rule matched"
        );

        if !self.rule_set.resolve_templates {
            return MoveDecision {
                destination: Some(destination),
                matched_rule: Some(matched_rule),
                warnings: Vec::new(),
                errors: Vec::new(),
            };
        }

        let rendered = template::render_with_validation(&destination, metadata, true);
        MoveDecision {
            destination: Some(rendered.path),
            matched_rule: Some(matched_rule),
            warnings: rendered.warnings,
            errors: rendered.errors,
        }
    }

    /// Run the generation-appropriate matcher, without the filter stage.
    /// Returns the winning rule's identifier and its raw destination.
    pub(crate) fn select_destination(
        &self,
        metadata: &FileMetadata,
        now: DateTime<Utc>,
    ) -> Option<(String, String)> {
        match self.rule_set.generation {
            Generation::V1 => criteria::find_matching_rule(metadata, &self.rule_set.rules)
                .map(|rule| (rule.criteria.clone(), rule.path.clone())),
            Generation::V2 => triggers::find_matching_rule(metadata, &self.rule_set.rules_v2, now)
                .map(|rule| (rule.name.clone(), rule.destination.clone())),
        }
    }

    /// Resolve a destination the way [`decide_at`](Self::decide_at) would,
    /// without emitting warnings. Used by the preview reporter.
    pub(crate) fn resolve_destination(&self, metadata: &FileMetadata, destination: &str) -> String {
        if self.rule_set.resolve_templates {
            template::render_with_validation(destination, metadata, false).path
        } else {
            destination.to_string()
        }
    }
}
