//! Integration tests for Course Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coursecart-integration-tests
//! ```
//!
//! Each test boots its own storefront on an ephemeral port with an
//! in-memory session store, so no external services are needed.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use coursecart_storefront::catalog::Catalog;
use coursecart_storefront::config::{LogFormat, StorefrontConfig};
use coursecart_storefront::state::AppState;
use reqwest::Client;
use secrecy::SecretString;
use url::Url;

/// High-entropy signing secret used only by tests.
const TEST_SESSION_SECRET: &str =
    "k7Qz2mW9vR4tY8pL1nB6xC3hJ5gF0dSaZeUiOwKqMjNrTyVbXlPcHsGfDuEoIA12";

/// Catalog served by test servers.
pub const TEST_CATALOG: &str = r#"[
    {"name": "Algebra I", "price": "$49.99", "image": "/static/img/algebra.svg"},
    {"name": "Geometry", "price": "$39.50", "image": "/static/img/geometry.svg"}
]"#;

/// A storefront running on a background task.
pub struct TestServer {
    pub addr: SocketAddr,
}

impl TestServer {
    /// Bind to an ephemeral port and serve the storefront.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let catalog = Catalog::from_json(TEST_CATALOG).expect("Test catalog is valid JSON");
        let state = AppState::with_catalog(test_config(addr), catalog);
        let app = coursecart_storefront::app(state).expect("Failed to build app");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server failed: {e}");
            }
        });

        Self { addr }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A client with its own cookie jar, i.e. a separate visitor.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn visitor(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }
}

fn test_config(addr: SocketAddr) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: Url::parse(&format!("http://{addr}")).expect("Valid test URL"),
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        catalog_path: PathBuf::from("unused"),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
    }
}
