//! Course Cart Core - Cart state and shared types.
//!
//! This crate provides the cart logic used by every Course Cart component:
//! - `storefront` - Public-facing course storefront
//! - `cli` - Command-line cart inspection against a JSON file store
//!
//! # Architecture
//!
//! The core crate contains types, pure state transitions, and the
//! [`CartController`] that ties them to a [`CartStore`]. It performs no I/O
//! of its own; stores are supplied by the caller (the session in the
//! storefront, a JSON file in the CLI, [`MemoryStore`] in tests).
//!
//! # Modules
//!
//! - [`types`] - Money and quantity newtypes
//! - [`cart`] - Cart line items and pure add/remove/quantity/totals logic
//! - [`store`] - The persisted string-keyed store abstraction
//! - [`controller`] - Read-mutate-persist cycle over a store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod controller;
pub mod store;
pub mod types;

pub use cart::{AddOutcome, Cart, CartError, CartItem, CartTotals, Product, TAX_RATE, parse_index};
pub use controller::{CartController, Notice};
pub use store::{CART_KEY, CartStore, MemoryStore, StoreError};
pub use types::*;

pub use rust_decimal::Decimal;
