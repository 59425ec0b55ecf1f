//! Display formatting shared by every view of the dashboard.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Values below this magnitude (and non-zero) switch to scientific notation.
const SMALL_VALUE: Decimal = dec!(0.01);

/// Format an amount for display.
///
/// Two decimals with thousands separators, e.g. `1,234.50`. Non-zero values
/// smaller than one cent use scientific notation with three fractional
/// digits, e.g. `1.235e-3`.
pub fn format_number(value: Decimal) -> String {
    if !value.is_zero() && value.abs() < SMALL_VALUE {
        return format_scientific(value);
    }

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

fn format_scientific(value: Decimal) -> String {
    let mut mantissa = value.abs();
    let mut exponent: i32 = 0;
    while mantissa < Decimal::ONE {
        mantissa *= Decimal::TEN;
        exponent -= 1;
    }

    let mut mantissa = mantissa.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    if mantissa >= Decimal::TEN {
        mantissa /= Decimal::TEN;
        exponent += 1;
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}{:.3}e{}", sign, mantissa, exponent)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a second count as `HH:MM:SS`. Hours are not capped at 24.
pub fn format_countdown(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format an optional dollar amount, `--` when unknown.
pub fn format_money(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("${}", format_number(v)),
        None => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_regular() {
        assert_eq!(format_number(dec!(1234.5)), "1,234.50");
        assert_eq!(format_number(dec!(0)), "0.00");
        assert_eq!(format_number(dec!(999.999)), "1,000.00");
        assert_eq!(format_number(dec!(-1234567.891)), "-1,234,567.89");
        assert_eq!(format_number(dec!(0.01)), "0.01");
    }

    #[test]
    fn test_format_number_small_values() {
        assert_eq!(format_number(dec!(0.001234)), "1.234e-3");
        assert_eq!(format_number(dec!(-0.005)), "-5.000e-3");
        assert_eq!(format_number(dec!(0.0099996)), "1.000e-2");
        assert_eq!(format_number(dec!(0.00000012345)), "1.235e-7");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "00:00:00");
        assert_eq!(format_countdown(120), "00:02:00");
        assert_eq!(format_countdown(3725), "01:02:05");
        assert_eq!(format_countdown(360_000), "100:00:00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Some(dec!(1500))), "$1,500.00");
        assert_eq!(format_money(None), "--");
    }
}
