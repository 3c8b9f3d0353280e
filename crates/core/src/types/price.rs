//! Money amounts using decimal arithmetic.
//!
//! Amounts are plain [`Decimal`] values in the currency's standard unit.
//! Display always uses two decimal places, rounding midpoints away from zero.
//! A missing amount (`None`) stands for a price that could not be read from
//! its display text and renders as `NaN`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    const fn is_symbol(c: char) -> bool {
        matches!(c, '$' | '€' | '£')
    }
}

/// Round an amount to cents, midpoints away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly two decimal places.
///
/// `None` formats as `NaN`.
#[must_use]
pub fn format_amount(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "NaN".to_string(), |a| format!("{:.2}", round_money(a)))
}

/// Read an amount from price display text such as `"$49.99"`.
///
/// A single leading currency symbol is stripped, then the longest leading
/// decimal number is parsed. Leading whitespace and trailing text are
/// ignored. Returns `None` when no number can be read, or when the amount
/// is too large to be stored as a JSON number and read back.
///
/// ```
/// use coursecart_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("$49.99"), Some(Decimal::new(4999, 2)));
/// assert_eq!(parse_amount("  $12 per seat"), Some(Decimal::new(12, 0)));
/// assert_eq!(parse_amount("free"), None);
/// ```
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim_start();
    let text = text
        .strip_prefix(CurrencyCode::is_symbol)
        .unwrap_or(text)
        .trim_start();

    let number = text.get(..numeric_prefix_len(text))?;
    let amount = match number.strip_prefix('.') {
        Some(fraction) => Decimal::from_str(&format!("0.{fraction}")).ok(),
        None => match number.strip_prefix("-.") {
            Some(fraction) => Decimal::from_str(&format!("-0.{fraction}")).ok(),
            None => Decimal::from_str(number).ok(),
        },
    }?;

    survives_float_storage(amount).then_some(amount)
}

/// Whether `amount` can be written as an `f64` JSON number and decoded back
/// into a `Decimal`, the way stored cart prices are.
fn survives_float_storage(amount: Decimal) -> bool {
    amount
        .to_f64()
        .is_some_and(|f| f.is_finite() && Decimal::from_str(&f.to_string()).is_ok())
}

/// Byte length of the leading `[+-]?digits(.digits)?` run.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let has_int = end > int_start;

    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    } else if !has_int {
        return 0;
    }

    end
}
