//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Cart contents are not part of
/// it: each visitor's cart lives in their session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
}

impl AppState {
    /// Create application state, loading the catalog from
    /// `config.catalog_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = Catalog::load(&config.catalog_path)?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create application state with an already-loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the course catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }
}
