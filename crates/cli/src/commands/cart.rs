//! Cart commands.
//!
//! Each command runs one read-mutate-persist cycle through a
//! [`CartController`] and returns the rendered summary.
//!
//! # Usage
//!
//! ```bash
//! cart-cli add --name "Algebra I" --price '$49.99'
//! cart-cli set-quantity 0 3
//! cart-cli remove 0
//! cart-cli --store other.json show
//! ```

use std::fmt::Write as _;

use coursecart_core::{
    Cart, CartController, CartError, CartStore, CurrencyCode, Decimal, Product, Quantity,
    format_amount,
};

/// Print-ready cart summary.
#[must_use]
pub fn render(cart: &Cart) -> String {
    let mut out = String::from("Your Course's Cart\n");

    if cart.is_empty() {
        out.push_str("  Your cart is empty.\n");
    }
    for (index, item) in cart.items().iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{index}] {} - {} x {} = {}",
            item.name,
            money(item.price),
            item.quantity,
            money(item.line_total()),
        );
    }

    let totals = cart.totals();
    let _ = writeln!(out, "Subtotal: {}", money(totals.subtotal));
    let _ = writeln!(out, "Tax:      {}", money(totals.tax));
    let _ = writeln!(out, "Total:    {}", money(totals.grand_total));
    let _ = write!(out, "Badge:    🛒 ({})", cart.item_count());
    out
}

fn money(amount: Option<Decimal>) -> String {
    format!("{}{}", CurrencyCode::USD.symbol(), format_amount(amount))
}

/// Show the stored cart.
pub async fn show<S: CartStore>(store: S) -> String {
    let controller = CartController::initialize(store).await;
    render(controller.cart())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the cart cannot be written back.
pub async fn add<S: CartStore>(
    store: S,
    name: &str,
    price: &str,
    image: &str,
) -> Result<String, CartError> {
    let mut controller = CartController::initialize(store).await;
    let notice = controller
        .add(Product::from_card(name, price, image))
        .await?;
    tracing::info!("{}", notice.message());
    Ok(render(controller.cart()))
}

/// Remove the line item at `index`.
///
/// # Errors
///
/// Returns an error if the index is malformed or out of range, or if the
/// cart cannot be written back.
pub async fn remove<S: CartStore>(store: S, index: &str) -> Result<String, CartError> {
    let mut controller = CartController::initialize(store).await;
    let removed = controller.remove_at(index).await?;
    tracing::info!(name = %removed.name, "Removed from cart");
    Ok(render(controller.cart()))
}

/// Set the quantity of the line item at `index`. Values below 1 store 1.
///
/// # Errors
///
/// Returns an error if the index is malformed or out of range, or if the
/// cart cannot be written back.
pub async fn set_quantity<S: CartStore>(
    store: S,
    index: &str,
    quantity: &str,
) -> Result<String, CartError> {
    let mut controller = CartController::initialize(store).await;
    controller
        .set_quantity_at(index, Quantity::parse_input(quantity))
        .await?;
    Ok(render(controller.cart()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coursecart_core::{CART_KEY, MemoryStore};

    use super::*;

    #[tokio::test]
    async fn test_add_twice_renders_totals() {
        let store = MemoryStore::new();
        add(store.clone(), "Algebra I", "$49.99", "").await.unwrap();
        let out = add(store.clone(), "Algebra I", "$49.99", "").await.unwrap();

        assert!(out.contains("[0] Algebra I - $49.99 x 2 = $99.98"));
        assert!(out.contains("Subtotal: $99.98"));
        assert!(out.contains("Tax:      $8.00"));
        assert!(out.contains("Total:    $107.98"));
        assert!(out.ends_with("🛒 (2)"));
    }

    #[tokio::test]
    async fn test_set_quantity_negative_stores_one() {
        let store = MemoryStore::new();
        add(store.clone(), "Geometry", "$39.50", "").await.unwrap();
        set_quantity(store.clone(), "0", "5").await.unwrap();
        let out = set_quantity(store.clone(), "0", "-3").await.unwrap();

        assert!(out.contains("x 1 ="));
        let raw = store.get(CART_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""quantity":1"#));
    }

    #[tokio::test]
    async fn test_remove_only_item_shows_placeholder() {
        let store = MemoryStore::new();
        add(store.clone(), "Precalculus", "$59.99", "").await.unwrap();
        let out = remove(store, "0").await.unwrap();

        assert!(out.contains("Your cart is empty."));
        assert!(out.contains("Total:    $0.00"));
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_error() {
        let store = MemoryStore::new();
        add(store.clone(), "Precalculus", "$59.99", "").await.unwrap();

        let err = remove(store.clone(), "4").await.unwrap_err();
        assert!(matches!(err, CartError::IndexOutOfRange { index: 4, len: 1 }));
        assert!(show(store).await.contains("Precalculus"));
    }
}
