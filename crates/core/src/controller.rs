//! Cart controller: the read-mutate-persist cycle.
//!
//! A [`CartController`] is created per UI event (or per request). It loads
//! the cart once, applies one mutation, and writes the whole cart back before
//! returning. Rendering is left to the caller, which reads the resulting
//! state through [`CartController::cart`].

use crate::cart::{AddOutcome, Cart, CartError, CartItem, CartTotals, Product, parse_index};
use crate::store::{CART_KEY, CartStore};
use crate::types::Quantity;

/// A user-visible acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(pub String);

impl Notice {
    /// Acknowledgment shown after adding `name` to the cart.
    #[must_use]
    pub fn added(name: &str) -> Self {
        Self(format!("{name} added to cart!"))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Owns a cart and the store it is persisted in.
#[derive(Debug)]
pub struct CartController<S> {
    store: S,
    cart: Cart,
}

impl<S: CartStore> CartController<S> {
    /// Load the cart from `store`.
    ///
    /// Never fails: a missing value, a store error, or a value that does not
    /// decode all give an empty cart.
    pub async fn initialize(store: S) -> Self {
        let cart = match store.get(CART_KEY).await {
            Ok(Some(raw)) if raw.trim().is_empty() => Cart::new(),
            Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored cart is malformed, starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        };

        Self { store, cart }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Badge count: the sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Add one unit of `product` and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written back to the store.
    pub async fn add(&mut self, product: Product) -> Result<Notice, CartError> {
        let notice = Notice::added(&product.name);
        let name = product.name.clone();

        match self.cart.add(product) {
            AddOutcome::Inserted { index } => {
                tracing::debug!(%name, index, "Added new cart item");
            }
            AddOutcome::Incremented { index, quantity } => {
                tracing::debug!(%name, index, %quantity, "Incremented cart item");
            }
        }

        self.persist().await?;
        Ok(notice)
    }

    /// Remove the item at the position named by `index` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedIndex`] or [`CartError::IndexOutOfRange`]
    /// without touching the cart or the store, or a store error if the write
    /// fails.
    pub async fn remove_at(&mut self, index: &str) -> Result<CartItem, CartError> {
        let index = parse_index(index)?;
        let removed = self.cart.remove_at(index)?;
        tracing::debug!(name = %removed.name, index, "Removed cart item");

        self.persist().await?;
        Ok(removed)
    }

    /// Set the quantity of the item at the position named by `index` and
    /// persist. The quantity has already been clamped to at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedIndex`] or [`CartError::IndexOutOfRange`]
    /// without touching the cart or the store, or a store error if the write
    /// fails.
    pub async fn set_quantity_at(&mut self, index: &str, quantity: Quantity) -> Result<(), CartError> {
        let index = parse_index(index)?;
        self.cart.set_quantity_at(index, quantity)?;
        tracing::debug!(index, %quantity, "Updated cart item quantity");

        self.persist().await
    }

    /// Hand back the store, dropping the in-memory cart.
    pub fn into_store(self) -> S {
        self.store
    }

    async fn persist(&self) -> Result<(), CartError> {
        let raw = self.cart.to_json()?;
        self.store.set(CART_KEY, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::{MemoryStore, StoreError};

    fn algebra() -> Product {
        Product::from_card("Algebra I", "$49.99", "/static/img/algebra.jpg")
    }

    async fn stored_cart(store: &MemoryStore) -> Cart {
        let raw = store.get(CART_KEY).await.unwrap().unwrap();
        Cart::from_json(&raw).unwrap()
    }

    /// A store whose reads and writes always fail.
    struct BrokenStore;

    impl CartStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Read("unavailable".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Write("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_initialize_empty_store() {
        let controller = CartController::initialize(MemoryStore::new()).await;
        assert!(controller.cart().is_empty());
        assert_eq!(controller.item_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_malformed_value_is_empty() {
        for raw in ["{not json", "null", "42", r#"[{"name":"x"}]"#, ""] {
            let store = MemoryStore::with_entry(CART_KEY, raw);
            let controller = CartController::initialize(store).await;
            assert!(controller.cart().is_empty(), "value {raw:?}");
        }
    }

    #[tokio::test]
    async fn test_initialize_store_error_is_empty() {
        let controller = CartController::initialize(BrokenStore).await;
        assert!(controller.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_scenario_persists_every_step() {
        let store = MemoryStore::new();
        let mut controller = CartController::initialize(store.clone()).await;

        let notice = controller.add(algebra()).await.unwrap();
        assert_eq!(notice.message(), "Algebra I added to cart!");
        assert_eq!(controller.item_count(), 1);
        assert_eq!(stored_cart(&store).await.items()[0].quantity.get(), 1);

        controller.add(algebra()).await.unwrap();
        assert_eq!(controller.item_count(), 2);
        assert_eq!(controller.cart().len(), 1);

        let persisted = stored_cart(&store).await;
        assert_eq!(persisted.items()[0].quantity.get(), 2);

        let totals = controller.totals();
        assert_eq!(totals.subtotal, Some(Decimal::new(9998, 2)));
        assert_eq!(totals.tax_display(), "8.00");
        assert_eq!(totals.grand_total_display(), "107.98");
    }

    #[tokio::test]
    async fn test_cart_survives_reload() {
        let store = MemoryStore::new();
        let mut controller = CartController::initialize(store.clone()).await;
        controller.add(algebra()).await.unwrap();
        controller.add(algebra()).await.unwrap();

        let reloaded = CartController::initialize(store).await;
        assert_eq!(reloaded.item_count(), 2);
        assert_eq!(reloaded.cart().items()[0].name, "Algebra I");
    }

    #[tokio::test]
    async fn test_extreme_price_does_not_wipe_cart_on_reload() {
        let store = MemoryStore::new();
        let mut controller = CartController::initialize(store.clone()).await;
        controller.add(algebra()).await.unwrap();
        controller
            .add(Product::from_card("X", "$79228162514264337593543950335", ""))
            .await
            .unwrap();

        let reloaded = CartController::initialize(store).await;
        assert_eq!(reloaded.cart().len(), 2);
        assert_eq!(reloaded.cart().items()[0].name, "Algebra I");
        assert_eq!(reloaded.cart().items()[1].price, None);
    }

    #[tokio::test]
    async fn test_set_quantity_negative_stores_one() {
        let store = MemoryStore::new();
        let mut controller = CartController::initialize(store.clone()).await;
        controller.add(algebra()).await.unwrap();

        controller
            .set_quantity_at("0", Quantity::clamped(-3))
            .await
            .unwrap();

        assert_eq!(stored_cart(&store).await.items()[0].quantity.get(), 1);
    }

    #[tokio::test]
    async fn test_remove_only_item() {
        let store = MemoryStore::new();
        let mut controller = CartController::initialize(store.clone()).await;
        controller.add(algebra()).await.unwrap();

        let removed = controller.remove_at("0").await.unwrap();

        assert_eq!(removed.name, "Algebra I");
        assert!(controller.cart().is_empty());
        assert!(stored_cart(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_index_leaves_store_untouched() {
        let store = MemoryStore::new();
        let mut controller = CartController::initialize(store.clone()).await;
        controller.add(algebra()).await.unwrap();
        let before = store.get(CART_KEY).await.unwrap();

        assert!(matches!(
            controller.remove_at("abc").await,
            Err(CartError::MalformedIndex(_))
        ));
        assert!(matches!(
            controller.remove_at("5").await,
            Err(CartError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert!(matches!(
            controller.set_quantity_at("1", Quantity::ONE).await,
            Err(CartError::IndexOutOfRange { index: 1, len: 1 })
        ));

        assert_eq!(store.get(CART_KEY).await.unwrap(), before);
        assert_eq!(controller.item_count(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let mut controller = CartController::initialize(BrokenStore).await;
        assert!(matches!(
            controller.add(algebra()).await,
            Err(CartError::Store(StoreError::Write(_)))
        ));
    }
}
