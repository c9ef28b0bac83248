//! Numeric operators for number-typed properties.

/// Evaluate a numeric operator. A comparison value that does not parse as
/// a number never matches.
pub fn evaluate(actual: f64, operator: &str, value: &str) -> bool {
    let Ok(value) = value.trim().parse::<f64>() else {
        return false;
    };
    match operator {
        "equals" => actual == value,
        "does not equal" => actual != value,
        "is less than" => actual < value,
        "is more than" => actual > value,
        "is divisible by" => value != 0.0 && actual % value == 0.0,
        "is not divisible by" => value != 0.0 && actual % value != 0.0,
        _ => false,
    }
}
