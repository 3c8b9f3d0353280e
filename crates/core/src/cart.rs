//! Cart line items and pure state transitions.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s addressed by position.
//! Positions are not stable ids: removing an item shifts every later item
//! down by one. Names are unique within a cart, compared byte for byte.
//!
//! Nothing here touches a store. See [`crate::controller`] for the
//! read-mutate-persist cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;
use crate::types::{Quantity, format_amount, parse_amount};

/// Sales tax applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The index text is not a non-negative integer.
    #[error("invalid cart index: {0:?}")]
    MalformedIndex(String),

    /// The index is past the end of the cart.
    #[error("cart index {index} is out of range (cart has {len} items)")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of items in the cart.
        len: usize,
    },

    /// The cart could not be encoded for the store.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A product as offered on a catalog card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    /// `None` when the card's price text could not be read.
    pub price: Option<Decimal>,
    pub image: String,
}

impl Product {
    /// Build a product from the text shown on a catalog card.
    ///
    /// The price is read with [`parse_amount`]; unreadable price text gives
    /// a product with no price rather than an error.
    #[must_use]
    pub fn from_card(name: &str, price_text: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            price: parse_amount(price_text),
            image: image.to_string(),
        }
    }
}

/// One product entry in the cart.
///
/// Serializes as `{"name", "price", "image", "quantity"}` with the price as a
/// JSON number, or `null` when it is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub image: String,
    pub quantity: Quantity,
}

impl CartItem {
    /// Price times quantity, `None` when the price is unknown or the
    /// product does not fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price?.checked_mul(Decimal::from(self.quantity.get()))
    }
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was appended at `index`.
    Inserted { index: usize },
    /// An entry with the same name already existed at `index`; its quantity
    /// is now `quantity`.
    Incremented { index: usize, quantity: Quantity },
}

/// An ordered list of cart line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Decode a cart from its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of cart items.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encode the cart to its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CartItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Add one unit of `product`.
    ///
    /// If an item with exactly the same name exists its quantity goes up by
    /// one and its price and image are left as they were. Otherwise the
    /// product is appended with quantity 1.
    pub fn add(&mut self, product: Product) -> AddOutcome {
        if let Some((index, item)) = self
            .items
            .iter_mut()
            .enumerate()
            .find(|(_, item)| item.name == product.name)
        {
            item.quantity = item.quantity.incremented();
            return AddOutcome::Incremented {
                index,
                quantity: item.quantity,
            };
        }

        self.items.push(CartItem {
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: Quantity::ONE,
        });
        AddOutcome::Inserted {
            index: self.items.len() - 1,
        }
    }

    /// Remove and return the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] and leaves the cart unchanged
    /// if `index` is past the end.
    pub fn remove_at(&mut self, index: usize) -> Result<CartItem, CartError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Replace the quantity of the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] and leaves the cart unchanged
    /// if `index` is past the end.
    pub fn set_quantity_at(&mut self, index: usize, quantity: Quantity) -> Result<(), CartError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index, len })?;
        item.quantity = quantity;
        Ok(())
    }

    /// Subtotal, tax, and grand total for the current contents.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal = self
            .items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?));
        CartTotals::from_subtotal(subtotal)
    }

    fn check_index(&self, index: usize) -> Result<(), CartError> {
        let len = self.items.len();
        if index < len {
            Ok(())
        } else {
            Err(CartError::IndexOutOfRange { index, len })
        }
    }
}

/// Parse a cart position taken from UI state.
///
/// # Errors
///
/// Returns [`CartError::MalformedIndex`] unless `raw` (ignoring surrounding
/// whitespace) is a non-negative integer.
pub fn parse_index(raw: &str) -> Result<usize, CartError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| CartError::MalformedIndex(raw.to_string()))
}

/// Cart summary amounts.
///
/// All three are `None` when any item has an unknown price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub grand_total: Option<Decimal>,
}

impl CartTotals {
    /// Derive tax and grand total from a subtotal using [`TAX_RATE`].
    #[must_use]
    pub fn from_subtotal(subtotal: Option<Decimal>) -> Self {
        let tax = subtotal.map(|s| s * TAX_RATE);
        let grand_total = subtotal.zip(tax).and_then(|(s, t)| s.checked_add(t));
        Self {
            subtotal,
            tax,
            grand_total,
        }
    }

    /// Subtotal formatted to two decimal places.
    #[must_use]
    pub fn subtotal_display(&self) -> String {
        format_amount(self.subtotal)
    }

    /// Tax formatted to two decimal places.
    #[must_use]
    pub fn tax_display(&self) -> String {
        format_amount(self.tax)
    }

    /// Grand total formatted to two decimal places.
    #[must_use]
    pub fn grand_total_display(&self) -> String {
        format_amount(self.grand_total)
    }
}
