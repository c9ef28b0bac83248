//! List operators for `headings`, `tag`, `links`, and `embeds` criteria,
//! and for list-typed properties.

use crate::rules::regex_cache;

/// Evaluate a list operator against the items.
///
/// String comparisons are case-insensitive, matching the text family.
/// The `all …` operators are false on an empty list (vacuous-false); the
/// `none …` operators are true on one, and `any …` false.
pub fn evaluate(items: &[String], operator: &str, value: &str) -> bool {
    match operator {
        "count is" => parse_count(value).is_some_and(|n| items.len() == n),
        "count is not" => parse_count(value).is_some_and(|n| items.len() != n),
        "count is less than" => parse_count(value).is_some_and(|n| items.len() < n),
        "count is more than" => parse_count(value).is_some_and(|n| items.len() > n),
        "all match regex" => {
            !items.is_empty()
                && match regex_cache::compile(value) {
                    Some(re) => items.iter().all(|item| re.is_match(item)),
                    None => false,
                }
        }
        "any match regex" => match regex_cache::compile(value) {
            Some(re) => items.iter().any(|item| re.is_match(item)),
            None => false,
        },
        _ => {
            let value = value.to_lowercase();
            let items: Vec<String> = items.iter().map(|item| item.to_lowercase()).collect();
            match operator {
                "includes item" => items.iter().any(|item| *item == value),
                "does not include item" => !items.iter().any(|item| *item == value),
                "all are" => !items.is_empty() && items.iter().all(|item| *item == value),
                "all start with" => {
                    !items.is_empty() && items.iter().all(|item| item.starts_with(&value))
                }
                "all end with" => {
                    !items.is_empty() && items.iter().all(|item| item.ends_with(&value))
                }
                "any contain" => items.iter().any(|item| item.contains(&value)),
                "any end with" => items.iter().any(|item| item.ends_with(&value)),
                "none contain" => !items.iter().any(|item| item.contains(&value)),
                "none start with" => !items.iter().any(|item| item.starts_with(&value)),
                "none end with" => !items.iter().any(|item| item.ends_with(&value)),
                _ => false,
            }
        }
    }
}

fn parse_count(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}
