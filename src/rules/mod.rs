//! Rule and trigger data model plus the two matcher generations.
//!
//! Generation 1 rules pair a raw `"type: value"` criterion string with a
//! destination path. Generation 2 rules carry a list of typed [`Trigger`]s
//! combined via an [`Aggregation`]. Both generations select the first
//! matching rule in stored order; list order is the only priority signal
//! the user controls.

pub mod criteria;
pub mod ops;
pub mod regex_cache;
pub mod triggers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading rule configuration from the host settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings JSON could not be parsed
    #[error("Invalid rule configuration: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Which rule generation the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Generation {
    /// Criterion-string rules ([`Rule`])
    V1,
    /// Typed trigger rules ([`RuleV2`])
    V2,
}

impl Default for Generation {
    fn default() -> Self {
        Generation::V1
    }
}

/// Polarity of the pre-rule filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Any matching criterion excludes the file
    Blacklist,
    /// Every criterion must match for the file to pass
    Whitelist,
}

/// Generation-1 rule: one criterion string and a destination path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Raw `"type: value"` predicate, parsed lazily per evaluation
    pub criteria: String,
    /// Destination folder for matching files
    pub path: String,
}

/// Criteria families a Generation-2 trigger can target.
///
/// Unknown values deserialize to [`CriteriaType::Unknown`] and never match,
/// keeping the evaluator total over settings written by newer versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriteriaType {
    #[serde(rename = "fileName")]
    FileName,
    #[serde(rename = "folder")]
    Folder,
    #[serde(rename = "extension")]
    Extension,
    #[serde(rename = "headings")]
    Headings,
    #[serde(rename = "tag")]
    Tag,
    #[serde(rename = "links")]
    Links,
    #[serde(rename = "embeds")]
    Embeds,
    #[serde(rename = "created_at")]
    CreatedAt,
    #[serde(rename = "modified_at")]
    ModifiedAt,
    #[serde(rename = "properties")]
    Properties,
    #[serde(other)]
    Unknown,
}

/// Declared type of a frontmatter property, selecting the operator family
/// used once the base existence operators do not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Text,
    Number,
    List,
    Date,
    Checkbox,
    #[serde(other)]
    Unknown,
}

/// A single typed predicate inside a Generation-2 rule.
///
/// The operator stays a plain string: an operator this version does not
/// know evaluates to `false` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub criteria_type: CriteriaType,
    pub operator: String,
    #[serde(default)]
    pub value: String,
    /// Property key, only meaningful for `properties` criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    /// Declared property type, only meaningful for `properties` criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
}

/// Boolean combinator applied across a rule's trigger results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Every trigger must match
    All,
    /// At least one trigger must match
    Any,
    /// No trigger may match
    None,
}

/// Generation-2 rule: named, aggregated triggers plus a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleV2 {
    pub name: String,
    pub destination: String,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Caller-owned rule configuration, taken as an immutable snapshot at
/// batch start. The engine holds no setters; stability for the duration of
/// a batch is structural, not a caller discipline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    pub generation: Generation,
    /// Generation-1 rules, in priority order
    pub rules: Vec<Rule>,
    /// Generation-2 rules, in priority order
    pub rules_v2: Vec<RuleV2>,
    /// Generation-1 criterion strings applied as a pre-rule filter
    pub filters: Vec<String>,
    /// Resolve `{{...}}` placeholders in the chosen destination
    pub resolve_templates: bool,
}

impl RuleSet {
    /// Parse a rule set from the host's settings JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
