//! Line-item quantity.

use core::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A line-item quantity, always at least 1.
///
/// Every constructor clamps instead of failing: values below 1 become 1 and
/// values above `u32::MAX` saturate. Deserialization rejects 0 so a stored
/// cart holding a zero quantity is treated as malformed.
///
/// ```
/// use coursecart_core::Quantity;
///
/// assert_eq!(Quantity::clamped(-3).get(), 1);
/// assert_eq!(Quantity::parse_input("4").get(), 4);
/// assert_eq!(Quantity::parse_input("abc").get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Build a quantity from any integer, clamping into `1..=u32::MAX`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let value = u32::try_from(value.max(1)).unwrap_or(u32::MAX);
        NonZeroU32::new(value).map_or(Self::ONE, Self)
    }

    /// Read a quantity from form input text.
    ///
    /// Takes the leading integer (optional whitespace and sign, then digits)
    /// and ignores the rest, so `"3.7"` reads as 3. Input without digits
    /// clamps to 1 like any other value below 1.
    #[must_use]
    pub fn parse_input(text: &str) -> Self {
        let text = text.trim_start();
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, text.get(1..).unwrap_or_default()),
            Some(b'+') => (false, text.get(1..).unwrap_or_default()),
            _ => (false, text),
        };

        let len = digits.bytes().take_while(u8::is_ascii_digit).count();
        let Some(digits) = digits.get(..len).filter(|d| !d.is_empty()) else {
            return Self::ONE;
        };

        if negative {
            return Self::ONE;
        }

        // Overflowing digit runs saturate.
        digits
            .parse::<i64>()
            .map_or(Self(NonZeroU32::MAX), Self::clamped)
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more than this quantity, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
