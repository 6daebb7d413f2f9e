//! Amount formatting for display.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Minor-unit digits used when a currency is unknown.
pub const DEFAULT_DECIMALS: u32 = 2;

const MAX_DECIMALS: u32 = 28;

/// Format `amount` with exactly `decimals` fraction digits and `,` grouping.
///
/// Midpoints round away from zero: `2.5` with 0 decimals becomes `3`.
pub fn format_amount(amount: Decimal, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Format a decimal string as returned by the service.
///
/// Returns `None` when `raw` is not a number.
pub fn format_amount_str(raw: &str, decimals: u32) -> Option<String> {
    let amount = Decimal::from_str(raw.trim()).ok()?;
    Some(format_amount(amount, decimals))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pads_to_currency_decimals() {
        assert_eq!(format_amount(dec!(1234.5), 2), "1,234.50");
        assert_eq!(format_amount(dec!(999), 2), "999.00");
        assert_eq!(format_amount(dec!(12.3456), 3), "12.346");
    }

    #[test]
    fn test_zero_decimal_currency() {
        assert_eq!(format_amount(dec!(1500), 0), "1,500");
        assert_eq!(format_amount(dec!(2.5), 0), "3");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(format_amount(dec!(0.005), 2), "0.01");
        assert_eq!(format_amount(dec!(1234567.125), 2), "1,234,567.13");
        assert_eq!(format_amount(dec!(-2.5), 0), "-3");
    }

    #[test]
    fn test_negative_rounding_to_zero_drops_sign() {
        assert_eq!(format_amount(dec!(-0.001), 2), "0.00");
        assert_eq!(format_amount(dec!(-1000), 2), "-1,000.00");
    }

    #[test]
    fn test_grouping_boundaries() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100000"), "100,000");
        assert_eq!(group_thousands("1000000"), "1,000,000");
    }

    #[test]
    fn test_format_service_strings() {
        assert_eq!(format_amount_str("100.5", 2).as_deref(), Some("100.50"));
        assert_eq!(format_amount_str(" 1000000 ", 0).as_deref(), Some("1,000,000"));
        assert_eq!(format_amount_str("n/a", 2), None);
    }
}
