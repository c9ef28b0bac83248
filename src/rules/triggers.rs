//! Generation-2 trigger matching.
//!
//! Each trigger dispatches by criteria type to a typed operator family
//! ([`super::ops`]); a rule's trigger results are then combined via its
//! [`Aggregation`]. Property triggers check four existence operators first
//! and only then dispatch by declared property type, coercing the raw JSON
//! value into the family's input shape.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::FileMetadata;
use crate::rules::ops::{date, list, number, text};
use crate::rules::{Aggregation, CriteriaType, PropertyType, RuleV2, Trigger};

/// Evaluate a single trigger against a metadata snapshot at a fixed `now`.
///
/// Unknown criteria types, property types, and operators evaluate to
/// `false`.
pub fn evaluate_trigger(metadata: &FileMetadata, trigger: &Trigger, now: DateTime<Utc>) -> bool {
    let op = trigger.operator.as_str();
    let value = trigger.value.as_str();

    match trigger.criteria_type {
        CriteriaType::FileName => text::evaluate(&metadata.file_name, op, value),
        CriteriaType::Folder => text::evaluate(metadata.folder(), op, value),
        CriteriaType::Extension => text::evaluate(&metadata.extension, op, value),
        CriteriaType::Headings => list::evaluate(&metadata.headings, op, value),
        CriteriaType::Tag => list::evaluate(&metadata.tags, op, value),
        CriteriaType::Links => list::evaluate(&metadata.links, op, value),
        CriteriaType::Embeds => list::evaluate(&metadata.embeds, op, value),
        CriteriaType::CreatedAt => date::evaluate(metadata.created_at, op, value, now),
        CriteriaType::ModifiedAt => date::evaluate(metadata.updated_at, op, value, now),
        CriteriaType::Properties => evaluate_property_trigger(metadata, trigger, now),
        CriteriaType::Unknown => false,
    }
}

/// Combine trigger results. An empty slice aggregates to `false` for every
/// mode; rule selection skips empty rules earlier, but the aggregator must
/// hold the invariant on its own.
pub fn evaluate_aggregation(results: &[bool], aggregation: Aggregation) -> bool {
    if results.is_empty() {
        return false;
    }
    match aggregation {
        Aggregation::All => results.iter().all(|r| *r),
        Aggregation::Any => results.iter().any(|r| *r),
        Aggregation::None => results.iter().all(|r| !*r),
    }
}

/// Find the first matching rule in stored order.
///
/// Inactive rules and rules without triggers are skipped.
pub fn find_matching_rule<'a>(
    metadata: &FileMetadata,
    rules: &'a [RuleV2],
    now: DateTime<Utc>,
) -> Option<&'a RuleV2> {
    rules.iter().find(|rule| {
        if !rule.active || rule.triggers.is_empty() {
            return false;
        }
        let results: Vec<bool> = rule
            .triggers
            .iter()
            .map(|trigger| evaluate_trigger(metadata, trigger, now))
            .collect();
        evaluate_aggregation(&results, rule.aggregation)
    })
}

fn evaluate_property_trigger(
    metadata: &FileMetadata,
    trigger: &Trigger,
    now: DateTime<Utc>,
) -> bool {
    let Some(name) = trigger.property_name.as_deref() else {
        return false;
    };
    let raw = metadata.properties.get(name);

    // Base operators apply regardless of the declared property type
    match trigger.operator.as_str() {
        "property is present" => return raw.is_some(),
        "property is missing" => return raw.is_none(),
        "has any value" => return raw.is_some_and(|v| !is_empty_value(v)),
        "has no value" => return raw.map_or(true, is_empty_value),
        _ => {}
    }

    let op = trigger.operator.as_str();
    let value = trigger.value.as_str();
    match trigger.property_type {
        Some(PropertyType::Text) => match raw {
            Some(v) => text::evaluate(&coerce_string(v), op, value),
            None => false,
        },
        Some(PropertyType::Number) => match raw.and_then(coerce_number) {
            Some(n) => number::evaluate(n, op, value),
            None => false,
        },
        Some(PropertyType::List) => match raw {
            Some(v) => list::evaluate(&coerce_list(v), op, value),
            None => false,
        },
        Some(PropertyType::Date) => date::evaluate(raw.and_then(coerce_date), op, value, now),
        Some(PropertyType::Checkbox) => {
            let checked = raw.is_some_and(coerce_bool);
            match op {
                "is true" => raw.is_some() && checked,
                "is false" => raw.is_some() && !checked,
                _ => false,
            }
        }
        Some(PropertyType::Unknown) | None => false,
    }
}

/// Missing, `null`, and the empty string all count as "no value".
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Nested shapes are not comparable as text
        _ => String::new(),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Date properties arrive as strings in frontmatter; unix-millisecond
/// numbers are accepted too.
fn coerce_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => date::parse_value(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Flatten a property into list items: arrays map element-wise, delimited
/// strings split on comma or newline, scalars become a single item.
fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(coerce_string).collect(),
        Value::String(s) => s
            .split(['\n', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Null => Vec::new(),
        other => vec![coerce_string(other)],
    }
}
