//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each handler loads the cart from the session, applies at most one
//! mutation (the controller writes the cart back), and renders from the
//! result. Every mutation answers with an `HX-Trigger` carrying
//! `cart-updated`, which makes the nav badge refetch `/cart/count`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
};
use coursecart_core::{Cart, CartItem, CurrencyCode, Decimal, Product, Quantity, format_amount};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::cart_store::load_cart;

/// Path of the cart page.
pub const CART_PAGE_PATH: &str = "/cart";

/// Acknowledgment for the checkout stub.
pub const CHECKOUT_NOTICE: &str = "Proceeding to checkout...";

/// Event that makes the badge refresh.
const CART_UPDATED_EVENT: &str = "cart-updated";

/// Event that shows a notice to the visitor.
const NOTICE_EVENT: &str = "cart-notice";

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    /// Position in the cart, used by the quantity and remove controls.
    pub index: usize,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
    pub item_count: u64,
}

/// Format an amount as dollars, `$NaN` when unknown.
fn format_money(amount: Option<Decimal>) -> String {
    format!("{}{}", CurrencyCode::USD.symbol(), format_amount(amount))
}

impl CartItemView {
    fn new(index: usize, item: &CartItem) -> Self {
        Self {
            index,
            name: item.name.clone(),
            image: item.image.clone(),
            price: format_money(item.price),
            quantity: item.quantity.get(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartItemView::new(index, item))
                .collect(),
            subtotal: format_money(totals.subtotal),
            tax: format_money(totals.tax),
            grand_total: format_money(totals.grand_total),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
    pub nonce: String,
}

/// Line-item and summary regions (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_regions.html")]
pub struct CartRegionsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data, copied from a catalog card.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    /// Display price text, e.g. "$49.99".
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub index: String,
    /// Raw input text; clamped to at least 1.
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: String,
}

// =============================================================================
// HTMX Helpers
// =============================================================================

/// Build an `HX-Trigger` header value from a JSON object.
///
/// Non-ASCII characters are written as `\u` escapes so product names
/// survive the trip through an HTTP header.
pub fn hx_trigger(events: &serde_json::Value) -> HeaderValue {
    let mut escaped = String::new();
    for c in events.to_string().chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    HeaderValue::from_str(&escaped).unwrap_or_else(|_| HeaderValue::from_static("{}"))
}

/// Trigger that refreshes the badge.
fn cart_updated() -> HeaderValue {
    hx_trigger(&serde_json::json!({ CART_UPDATED_EVENT: true }))
}

/// Trigger that refreshes the badge and shows `message`.
fn cart_updated_with_notice(message: &str) -> HeaderValue {
    hx_trigger(&serde_json::json!({
        CART_UPDATED_EVENT: true,
        NOTICE_EVENT: { "message": message },
    }))
}

/// Trigger that only shows `message`.
pub fn notice(message: &str) -> HeaderValue {
    hx_trigger(&serde_json::json!({ NOTICE_EVENT: { "message": message } }))
}

/// Whether the HTMX request was sent from the cart page.
fn on_cart_page(headers: &HeaderMap) -> bool {
    headers
        .get("hx-current-url")
        .and_then(|v| v.to_str().ok())
        .and_then(|url| url::Url::parse(url).ok())
        .is_some_and(|url| url.path().trim_end_matches('/') == CART_PAGE_PATH)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session, nonce))]
pub async fn show(session: Session, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    let controller = load_cart(session).await;
    let cart = CartView::from(controller.cart());

    CartShowTemplate {
        cart_count: cart.item_count,
        cart,
        nonce,
    }
}

/// Add one unit of a catalog product (HTMX).
///
/// Answers with the badge fragment, or with the cart regions when sent from
/// the cart page, plus a notice naming the product.
#[instrument(skip(session, headers), fields(product = %form.name))]
pub async fn add(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = Product::from_card(&form.name, &form.price, &form.image);
    if product.price.is_none() {
        tracing::warn!(price = %form.price, "Unreadable price text, adding without a price");
    }

    let mut controller = load_cart(session).await;
    let notice = controller.add(product).await?;
    add_breadcrumb("cart", "Added to cart", Some(&[("product", form.name.as_str())]));

    let trigger = AppendHeaders([("HX-Trigger", cart_updated_with_notice(notice.message()))]);
    let cart = CartView::from(controller.cart());

    if on_cart_page(&headers) {
        Ok((trigger, CartRegionsTemplate { cart }).into_response())
    } else {
        Ok((
            trigger,
            CartCountTemplate {
                cart_count: cart.item_count,
            },
        )
            .into_response())
    }
}

/// Update a line item's quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let quantity = Quantity::parse_input(&form.quantity);

    let mut controller = load_cart(session).await;
    controller.set_quantity_at(&form.index, quantity).await?;

    Ok((
        AppendHeaders([("HX-Trigger", cart_updated())]),
        CartRegionsTemplate {
            cart: CartView::from(controller.cart()),
        },
    )
        .into_response())
}

/// Remove a line item (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut controller = load_cart(session).await;
    let removed = controller.remove_at(&form.index).await?;
    add_breadcrumb("cart", "Removed from cart", Some(&[("product", removed.name.as_str())]));

    Ok((
        AppendHeaders([("HX-Trigger", cart_updated())]),
        CartRegionsTemplate {
            cart: CartView::from(controller.cart()),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let controller = load_cart(session).await;
    CartCountTemplate {
        cart_count: controller.item_count(),
    }
}

/// Checkout placeholder. Acknowledges and leaves the cart alone.
#[instrument]
pub async fn checkout() -> Response {
    tracing::info!("Checkout requested (no payment backend configured)");
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([("HX-Trigger", notice(CHECKOUT_NOTICE))]),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn two_algebra() -> Cart {
        let mut cart = Cart::new();
        cart.add(Product::from_card("Algebra I", "$49.99", "/static/img/algebra.svg"));
        cart.add(Product::from_card("Algebra I", "$49.99", "/static/img/algebra.svg"));
        cart
    }

    #[test]
    fn test_cart_view_scenario() {
        let view = CartView::from(&two_algebra());

        assert_eq!(view.item_count, 2);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.subtotal, "$99.98");
        assert_eq!(view.tax, "$8.00");
        assert_eq!(view.grand_total, "$107.98");
    }

    #[test]
    fn test_cart_view_unknown_price() {
        let mut cart = Cart::new();
        cart.add(Product::from_card("Mystery", "soon", ""));
        let view = CartView::from(&cart);

        assert_eq!(view.items.first().unwrap().price, "$NaN");
        assert_eq!(view.grand_total, "$NaN");
    }

    #[test]
    fn test_regions_render_items_and_summary() {
        let html = CartRegionsTemplate {
            cart: CartView::from(&two_algebra()),
        }
        .render()
        .unwrap();

        assert!(html.contains("col-md-8"));
        assert!(html.contains("col-md-4"));
        assert!(html.contains("Algebra I"));
        assert!(html.contains(r#"data-index="0""#));
        assert!(html.contains("remove-from-cart"));
        assert!(html.contains("checkout-button"));
        assert!(html.contains("$107.98"));
        assert!(!html.contains("Your cart is empty."));
    }

    #[test]
    fn test_regions_render_empty_placeholder() {
        let html = CartRegionsTemplate {
            cart: CartView::from(&Cart::new()),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your cart is empty."));
        assert!(!html.contains("cart-item"));
        assert!(html.contains("$0.00"));
    }

    #[test]
    fn test_badge_render() {
        let html = CartCountTemplate { cart_count: 2 }.render().unwrap();
        assert_eq!(html.trim(), "🛒 (2)");
    }

    #[test]
    fn test_hx_trigger_escapes_non_ascii() {
        let value = notice("Café Math added to cart!");
        let text = value.to_str().unwrap();
        assert!(text.contains("Caf\\u00e9"));

        let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed[NOTICE_EVENT]["message"], "Café Math added to cart!");
    }

    #[test]
    fn test_on_cart_page() {
        let mut headers = HeaderMap::new();
        assert!(!on_cart_page(&headers));

        headers.insert(
            "hx-current-url",
            HeaderValue::from_static("http://localhost:3000/cart"),
        );
        assert!(on_cart_page(&headers));

        headers.insert(
            "hx-current-url",
            HeaderValue::from_static("http://localhost:3000/"),
        );
        assert!(!on_cart_page(&headers));
    }
}
