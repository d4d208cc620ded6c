//! Numeric-string money parsing using decimal arithmetic.
//!
//! Price fields originate from free-text admin inputs and are stored as
//! strings in the document store (`"12.5"`, `"0"`, sometimes blank). The
//! parsing contract is hard: any blank or malformed input is treated as zero
//! and parsing never fails, because every derivation downstream must tolerate
//! whatever an admin typed.

use rust_decimal::Decimal;

/// Parse a numeric-string field into a [`Decimal`] amount.
///
/// Blank, whitespace-only and non-numeric input all yield zero; parsing
/// must never error.
///
/// # Examples
///
/// ```
/// use cedars_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("12.50"), Decimal::new(1250, 2));
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// assert_eq!(parse_amount("free"), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_amount(raw: &str) -> Decimal {
    raw.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Format an amount for display and CSV output.
///
/// Always two fractional digits.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
