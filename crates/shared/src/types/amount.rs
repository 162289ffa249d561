//! Amount type with decimal precision and Italian locale formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum total digits accepted from the transaction form.
pub const MAX_DIGITS: u32 = 10;
/// Maximum decimal places accepted from the transaction form.
pub const MAX_DECIMAL_PLACES: u32 = 2;

/// Errors raised while parsing an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The text is not a number.
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    /// More than [`MAX_DIGITS`] digits in total.
    #[error("at most {MAX_DIGITS} digits are allowed")]
    TooManyDigits,
    /// More than [`MAX_DECIMAL_PLACES`] decimal places.
    #[error("at most {MAX_DECIMAL_PLACES} decimal places are allowed")]
    TooManyDecimalPlaces,
}

/// A signed amount of euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub Decimal);

impl Amount {
    /// Creates an amount from a decimal.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parses a bank-export amount such as `-1.234,56` or `+500,00`.
    ///
    /// `+` signs and `.` thousands separators are dropped and `,` is read as the
    /// decimal separator.
    pub fn parse_bank(raw: &str) -> Result<Self, AmountError> {
        let normalized = raw.replace('+', "").trim().replace('.', "").replace(',', ".");

        Decimal::from_str(&normalized)
            .map(Self)
            .map_err(|_| AmountError::NotNumeric(raw.to_string()))
    }

    /// Parses an amount typed in the transaction form.
    ///
    /// Both `12.50` and `12,50` are accepted; at most ten digits with two
    /// decimal places.
    pub fn parse_form(raw: &str) -> Result<Self, AmountError> {
        let normalized = raw.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .map_err(|_| AmountError::NotNumeric(raw.to_string()))?;

        let normalized = value.normalize();
        if normalized.scale() > MAX_DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimalPlaces);
        }
        let integer_digits = normalized.trunc().abs().to_string().trim_start_matches('0').len();
        let integer_digits = u32::try_from(integer_digits).unwrap_or(u32::MAX);
        if integer_digits > MAX_DIGITS - MAX_DECIMAL_PLACES {
            return Err(AmountError::TooManyDigits);
        }

        Ok(Self(value))
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true for amounts greater than or equal to zero.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        !self.0.is_sign_negative() || self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Formats the amount for the spreadsheet, with a comma decimal separator.
    #[must_use]
    pub fn to_sheet_text(&self) -> String {
        self.0.to_string().replace('.', ",")
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("-1.234,56", dec!(-1234.56))]
    #[case("+500,00", dec!(500.00))]
    #[case("  -12,5 ", dec!(-12.5))]
    #[case("0,00", dec!(0))]
    #[case("1.000.000", dec!(1000000))]
    fn test_parse_bank(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(Amount::parse_bank(raw).unwrap().value(), expected);
    }

    #[test]
    fn test_parse_bank_drops_dots_even_as_decimal_point() {
        // "-100.50" is read with "." as thousands separator.
        assert_eq!(Amount::parse_bank("-100.50").unwrap().value(), dec!(-10050));
    }

    #[rstest]
    #[case("invalid")]
    #[case("")]
    #[case("12,34,56")]
    #[case("EUR 10")]
    fn test_parse_bank_rejects(#[case] raw: &str) {
        assert!(matches!(
            Amount::parse_bank(raw),
            Err(AmountError::NotNumeric(_))
        ));
    }

    #[rstest]
    #[case("100.50", dec!(100.50))]
    #[case("100,50", dec!(100.50))]
    #[case("12345678.99", dec!(12345678.99))]
    #[case("-3", dec!(-3))]
    fn test_parse_form(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(Amount::parse_form(raw).unwrap().value(), expected);
    }

    #[test]
    fn test_parse_form_limits() {
        assert_eq!(
            Amount::parse_form("1.234"),
            Err(AmountError::TooManyDecimalPlaces)
        );
        assert_eq!(
            Amount::parse_form("123456789.00"),
            Err(AmountError::TooManyDigits)
        );
        assert!(matches!(
            Amount::parse_form("abc"),
            Err(AmountError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_credit_and_positive() {
        assert!(Amount::new(dec!(0)).is_credit());
        assert!(Amount::new(dec!(1)).is_credit());
        assert!(!Amount::new(dec!(-0.01)).is_credit());

        assert!(!Amount::new(dec!(0)).is_positive());
        assert!(Amount::new(dec!(0.01)).is_positive());
    }

    #[test]
    fn test_to_sheet_text() {
        assert_eq!(Amount::new(dec!(100.50)).to_sheet_text(), "100,50");
        assert_eq!(Amount::parse_form("12.50").unwrap().to_sheet_text(), "12,50");
        assert_eq!(Amount::new(dec!(7)).to_sheet_text(), "7");
    }
}
