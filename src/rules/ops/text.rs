//! Text operators for `fileName`, `folder`, and `extension` criteria.

use crate::rules::regex_cache;

/// Evaluate a text operator. All comparisons are case-insensitive; the
/// regex operators compile through the shared case-insensitive cache.
///
/// An invalid pattern never matches for `match regex` and always matches
/// for `does not match regex`.
pub fn evaluate(actual: &str, operator: &str, value: &str) -> bool {
    match operator {
        "match regex" => match regex_cache::compile(value) {
            Some(re) => re.is_match(actual),
            None => false,
        },
        "does not match regex" => match regex_cache::compile(value) {
            Some(re) => !re.is_match(actual),
            None => true,
        },
        _ => {
            let actual = actual.to_lowercase();
            let value = value.to_lowercase();
            match operator {
                "is" => actual == value,
                "is not" => actual != value,
                "contains" => actual.contains(&value),
                "does not contain" => !actual.contains(&value),
                "starts with" => actual.starts_with(&value),
                "does not starts with" => !actual.starts_with(&value),
                "ends with" => actual.ends_with(&value),
                "does not ends with" => !actual.ends_with(&value),
                _ => false,
            }
        }
    }
}
