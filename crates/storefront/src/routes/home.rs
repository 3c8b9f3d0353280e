//! Home page route handler: the course catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CatalogCard;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::cart_store::load_cart;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub cards: Vec<CatalogCard>,
    pub cart_count: u64,
    pub nonce: String,
}

/// Display the course catalog.
#[instrument(skip(state, session, nonce))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let cart = load_cart(session).await;

    HomeTemplate {
        cards: state.catalog().cards().to_vec(),
        cart_count: cart.item_count(),
        nonce,
    }
}
