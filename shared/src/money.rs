//! Conversion between user-entered decimal strings and integer cents.
//!
//! Amounts are always held as non-negative cents. The parser accepts
//! `"12"`, `"12."`, `".5"`, `"12.5"` and truncates anything past the second
//! fractional digit (`"12.567"` is 1256 cents). An empty field means zero.

use crate::error::MoneyError;

/// Cents in one whole unit of currency
pub const CENTS_PER_UNIT: u64 = 100;

/// Parse a decimal amount into cents
pub fn parse_money(input: &str) -> Result<u64, MoneyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let invalid = || MoneyError::InvalidAmount(input.to_string());

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(invalid());
    }

    let units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| invalid())?
    };

    // Right-pad to two digits, then truncate
    let cents = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(2)
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0'));

    units
        .checked_mul(CENTS_PER_UNIT)
        .and_then(|total| total.checked_add(cents))
        .ok_or_else(invalid)
}

/// Format cents back into the two-decimal form the parser accepts
pub fn format_money(cents: u64) -> String {
    format!("{}.{:02}", cents / CENTS_PER_UNIT, cents % CENTS_PER_UNIT)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
