//! Core types for Course Cart.
//!
//! This module provides type-safe wrappers for money and line-item quantities.

pub mod price;
pub mod quantity;

pub use price::{CurrencyCode, format_amount, parse_amount, round_money};
pub use quantity::Quantity;
