//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the cart JSON value. Same key the cart controller uses for
    /// any store.
    pub const CART: &str = coursecart_core::CART_KEY;
}
