//! Numeric literal + unit normalization into millions.

use crate::constants::units;

/// Multiplier that converts a value in `unit` into millions.
///
/// Matching is case-insensitive; an absent or unrecognized unit means the
/// value is already in millions.
pub fn unit_multiplier(unit: Option<&str>) -> f64 {
    match unit.map(|u| u.trim().to_lowercase()).as_deref() {
        Some("billion" | "b") => units::BILLION,
        Some("million" | "m") => units::MILLION,
        _ => units::MILLION,
    }
}

/// Parse a possibly comma-grouped literal such as `"1,234.5"` and scale it by
/// its unit. Returns `None` when the literal is not a finite number.
pub fn parse_millions(literal: &str, unit: Option<&str>) -> Option<f64> {
    let cleaned: String = literal.chars().filter(|c| *c != ',').collect();
    let value = cleaned.trim().parse::<f64>().ok()?;
    value
        .is_finite()
        .then(|| value * unit_multiplier(unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_grouped_literals() {
        assert_eq!(parse_millions("391", None), Some(391.0));
        assert_eq!(parse_millions("1,234.5", None), Some(1234.5));
        assert_eq!(parse_millions("0", Some("million")), Some(0.0));
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_millions("2.5", Some("billion")), Some(2500.0));
        assert_eq!(parse_millions("2.5", Some("B")), Some(2500.0));
        assert_eq!(parse_millions("2.5", Some("Billion")), Some(2500.0));
        assert_eq!(parse_millions("750", Some("M")), Some(750.0));
        assert_eq!(parse_millions("750", Some("")), Some(750.0));
    }

    #[test]
    fn test_non_numeric_is_not_found() {
        assert_eq!(parse_millions(",,,", None), None);
        assert_eq!(parse_millions("", Some("million")), None);
        assert_eq!(parse_millions("1.2.3", None), None);
        assert_eq!(parse_millions("inf", None), None);
    }
}
