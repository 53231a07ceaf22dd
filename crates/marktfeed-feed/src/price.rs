//! Price normalization from locale-formatted source strings.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a locale-formatted price string (`"12,95 EUR"`, `"12.95"`, …).
///
/// Strips the `EUR` currency token, converts a decimal comma to a point, and
/// parses the remainder. Returns `None` when the field is empty or does not
/// parse — callers omit the price (and its type marker) in that case rather
/// than emitting a placeholder.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace("EUR", "").replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Price as an integer count of cents, rounded half-away-from-zero.
pub fn to_minor_units(value: Decimal) -> i64 {
    (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Price as a decimal string with exactly two fraction digits.
pub fn to_decimal_string(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_decimal_with_currency_suffix() {
        let d = parse_price("12,95 EUR").expect("should parse");
        assert_eq!(to_minor_units(d), 1295);
        assert_eq!(to_decimal_string(d), "12.95");
    }

    #[test]
    fn parses_dot_decimal_without_suffix() {
        let d = parse_price("19.99").expect("should parse");
        assert_eq!(to_minor_units(d), 1999);
    }

    #[test]
    fn parses_embedded_currency_token() {
        let d = parse_price("EUR 7,50").expect("should parse");
        assert_eq!(to_minor_units(d), 750);
    }

    #[test]
    fn parses_whole_euro_amount() {
        let d = parse_price("49 EUR").expect("should parse");
        assert_eq!(to_minor_units(d), 4900);
        assert_eq!(to_decimal_string(d), "49.00");
    }

    #[test]
    fn unparseable_price_is_none() {
        assert!(parse_price("gratis").is_none());
        assert!(parse_price("").is_none());
        assert!(parse_price("  EUR ").is_none());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 10,005 EUR sits exactly on the half-cent boundary.
        let d = parse_price("10,005").expect("should parse");
        assert_eq!(to_minor_units(d), 1001);
        assert_eq!(to_decimal_string(d), "10.01");
    }

    #[test]
    fn decimal_string_always_has_two_fraction_digits() {
        let d = parse_price("12,9").expect("should parse");
        assert_eq!(to_decimal_string(d), "12.90");
    }
}
