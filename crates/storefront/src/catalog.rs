//! Course catalog shown on the home page.
//!
//! The catalog is a JSON array of cards loaded once at startup:
//!
//! ```json
//! [
//!   {"name": "Algebra I", "price": "$49.99", "image": "/static/img/algebra.svg",
//!    "description": "Linear equations, inequalities, and functions."}
//! ]
//! ```
//!
//! Prices stay as display text. The add-to-cart form posts that text back
//! and the cart reads the amount from it.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One product card.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCard {
    pub name: String,
    /// Display price, e.g. "$49.99".
    pub price: String,
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// All product cards, cheaply cloneable.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Arc<Vec<CatalogCard>>,
}

impl Catalog {
    /// Build a catalog from cards already in memory.
    #[must_use]
    pub fn new(cards: Vec<CatalogCard>) -> Self {
        Self {
            cards: Arc::new(cards),
        }
    }

    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// cards.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of cards.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let cards: Vec<CatalogCard> = serde_json::from_str(raw)?;
        Ok(Self::new(cards))
    }

    #[must_use]
    pub fn cards(&self) -> &[CatalogCard] {
        &self.cards
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"[
                {"name": "Algebra I", "price": "$49.99", "image": "/a.svg"},
                {"name": "Geometry", "price": "$39.50", "image": "/g.svg", "description": "Shapes"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.cards().len(), 2);
        assert_eq!(catalog.cards()[0].price, "$49.99");
        assert_eq!(catalog.cards()[0].description, None);
        assert_eq!(catalog.cards()[1].description.as_deref(), Some("Shapes"));
    }

    #[test]
    fn test_from_json_rejects_object() {
        assert!(Catalog::from_json(r#"{"name": "Algebra I"}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_load_bundled_catalog() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("content/catalog.json");
        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.cards().iter().any(|card| card.name == "Algebra I"));
    }
}
