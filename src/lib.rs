//! Rule evaluation engine for automatic note relocation.
//!
//! Given an immutable [`FileMetadata`](models::FileMetadata) snapshot of a
//! single note and a caller-owned [`RuleSet`](rules::RuleSet), the engine
//! decides whether the note should move and where. Two rule generations are
//! supported:
//!
//! - Generation 1: raw `"type: value"` criterion strings, e.g.
//!   `tag: #food` or `fileName: Daily*`
//! - Generation 2: typed triggers with per-criteria-type operators,
//!   combined per rule via all/any/none aggregation
//!
//! A blacklist filter runs before rule matching, and the chosen destination
//! may contain `{{property}}` / `{{tag:name}}` template placeholders that
//! are resolved against the note's metadata.
//!
//! The engine performs no I/O and raises no errors for control flow: it is
//! a pure function of `(metadata, rules, filters)`. Malformed criteria,
//! unknown operators, and missing metadata all evaluate to "no match".

pub mod engine;
pub mod models;
pub mod preview;
pub mod rules;
pub mod template;

pub use engine::{MoveDecision, MoveEngine};
pub use models::FileMetadata;
pub use preview::{preview_files, MovePreview, PreviewEntry, PreviewStatus};
pub use rules::{
    Aggregation, ConfigError, CriteriaType, FilterMode, Generation, PropertyType, Rule, RuleSet,
    RuleV2, Trigger,
};
pub use template::RenderedPath;
