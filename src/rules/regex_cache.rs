//! Memoized compilation of case-insensitive regular expressions.
//!
//! Rule evaluation may run the same user-authored pattern against thousands
//! of files per batch; patterns are compiled once and reused. Compile
//! failures are cached too, so a bad pattern is not recompiled per file.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

fn cache() -> &'static Mutex<HashMap<String, Option<Regex>>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Option<Regex>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Compile `pattern` case-insensitively, memoizing by pattern text.
///
/// Returns `None` for invalid patterns; the failure is cached.
pub fn compile(pattern: &str) -> Option<Regex> {
    let mut map = match cache().lock() {
        Ok(guard) => guard,
        // A poisoned cache only loses memoization, not correctness
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(entry) = map.get(pattern) {
        return entry.clone();
    }

    let compiled = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok();
    map.insert(pattern.to_string(), compiled.clone());
    compiled
}
