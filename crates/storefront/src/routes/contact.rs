//! Contact form route handlers.
//!
//! Submissions are logged and acknowledged, then dropped. There is no
//! backend to forward them to yet; this is where one would be called.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::notice;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::cart_store::load_cart;

/// Acknowledgment shown after a submission.
pub const CONTACT_THANKS: &str = "Thank you for your message! We will get back to you soon.";

/// Contact form data. Missing fields read as empty.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub notice: Option<String>,
    pub cart_count: u64,
    pub nonce: String,
}

/// Contact form fragment (for HTMX). Always rendered empty.
#[derive(Template, WebTemplate)]
#[template(path = "partials/contact_form.html")]
pub struct ContactFormTemplate {
    pub notice: Option<String>,
}

/// Display the contact page.
#[instrument(skip(session, nonce))]
pub async fn show(session: Session, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    let cart = load_cart(session).await;

    ContactTemplate {
        notice: None,
        cart_count: cart.item_count(),
        nonce,
    }
}

/// Handle a contact form submission.
///
/// HTMX requests get a reset form fragment and a notice event; plain form
/// posts get the full page with the acknowledgment.
#[instrument(skip_all)]
pub async fn submit(
    session: Session,
    headers: HeaderMap,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ContactForm>,
) -> Response {
    tracing::info!(
        name = %form.name,
        email = %form.email,
        message = %form.message,
        "Contact form submitted"
    );

    if headers.contains_key("hx-request") {
        return (
            AppendHeaders([("HX-Trigger", notice(CONTACT_THANKS))]),
            ContactFormTemplate {
                notice: Some(CONTACT_THANKS.to_string()),
            },
        )
            .into_response();
    }

    let cart = load_cart(session).await;
    ContactTemplate {
        notice: Some(CONTACT_THANKS.to_string()),
        cart_count: cart.item_count(),
        nonce,
    }
    .into_response()
}
