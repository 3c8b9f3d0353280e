//! Session middleware configuration.
//!
//! Sessions live in memory and identify the visitor through a signed cookie.
//! The cart is the only thing kept in them.

use secrecy::ExposeSecret;
use thiserror::Error;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cc_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Error building the session layer.
#[derive(Debug, Error)]
pub enum SessionLayerError {
    #[error("session secret is not a usable signing key: {0}")]
    InvalidKey(String),
}

/// Create the session layer with an in-memory store.
///
/// # Errors
///
/// Returns an error if the configured secret is too short to derive a
/// cookie signing key.
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<MemoryStore, tower_sessions::service::SignedCookie>, SessionLayerError>
{
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|e| SessionLayerError::InvalidKey(e.to_string()))?;

    Ok(SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
