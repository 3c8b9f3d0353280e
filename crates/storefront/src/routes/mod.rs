//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Course catalog
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (badge fragment, triggers cart-updated + cart-notice)
//! POST /cart/update            - Update quantity (cart regions fragment)
//! POST /cart/remove            - Remove item (cart regions fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Placeholder, triggers cart-notice
//!
//! # Contact
//! GET  /contact                - Contact page
//! POST /contact                - Submit contact form
//! ```

pub mod cart;
pub mod contact;
pub mod home;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/contact", get(contact::show).post(contact::submit))
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
