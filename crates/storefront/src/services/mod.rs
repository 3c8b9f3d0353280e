//! Services backing the storefront routes.
//!
//! # Services
//!
//! - `cart_store` - Session-backed persisted store for the cart controller

pub mod cart_store;

pub use cart_store::SessionCartStore;
