//! Session-backed cart store.
//!
//! The visitor's session plays the role of the persisted key-value store:
//! each key holds one string value, and the cart controller reads and writes
//! the whole cart JSON under [`crate::models::session_keys::CART`].

use coursecart_core::{CartController, CartStore, StoreError};
use tower_sessions::Session;

/// A [`CartStore`] over a `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStore for SessionCartStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
    }
}

/// Load the visitor's cart from their session.
pub async fn load_cart(session: Session) -> CartController<SessionCartStore> {
    CartController::initialize(SessionCartStore::new(session)).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use coursecart_core::Product;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::models::session_keys;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_session_store_roundtrip() {
        let session = session();
        let mut cart = load_cart(session.clone()).await;
        cart.add(Product::from_card("Algebra I", "$49.99", "a.svg"))
            .await
            .unwrap();

        let raw: Option<String> = session.get(session_keys::CART).await.unwrap();
        assert!(raw.unwrap().contains("Algebra I"));

        let reloaded = load_cart(session).await;
        assert_eq!(reloaded.item_count(), 1);
    }

    #[tokio::test]
    async fn test_non_string_session_value_is_empty_cart() {
        let session = session();
        session.insert(session_keys::CART, 42).await.unwrap();

        let cart = load_cart(session).await;
        assert!(cart.cart().is_empty());
    }
}
