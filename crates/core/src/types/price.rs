//! Type-safe price representation using decimal arithmetic.
//!
//! Shop prices are integer amounts of Vietnamese đồng. They are held as
//! [`Decimal`] so sums and products are exact; `f64` is never involved.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Vietnamese đồng.
    #[must_use]
    pub const fn vnd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::VND)
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

/// Formats the price the way the shop renders it.
///
/// VND uses `.` as the thousands separator and no fractional digits
/// (`1.605.000 ₫`); the other currencies use a leading symbol and two decimals.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.currency_code {
            CurrencyCode::VND => {
                let rounded = self.amount.round();
                let digits = rounded.abs().trunc().to_string();
                let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
                    "-"
                } else {
                    ""
                };
                write!(f, "{sign}{} ₫", group_thousands(&digits, '.'))
            }
            code => write!(f, "{}{:.2}", code.symbol(), self.amount),
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    VND,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::VND => "₫",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_vnd_display_groups_thousands() {
        assert_eq!(Price::vnd(dec!(1605000)).to_string(), "1.605.000 ₫");
        assert_eq!(Price::vnd(dec!(20000)).to_string(), "20.000 ₫");
        assert_eq!(Price::vnd(dec!(999)).to_string(), "999 ₫");
        assert_eq!(Price::vnd(dec!(0)).to_string(), "0 ₫");
    }

    #[test]
    fn test_vnd_display_negative() {
        assert_eq!(Price::vnd(dec!(-15000)).to_string(), "-15.000 ₫");
    }

    #[test]
    fn test_other_currency_display() {
        let price = Price::new(dec!(19.9), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$19.90");
    }

    #[test]
    fn test_times() {
        let line = Price::vnd(dec!(500000)).times(2);
        assert_eq!(line.amount, dec!(1000000));
        assert_eq!(line.currency_code, CurrencyCode::VND);
    }
}
