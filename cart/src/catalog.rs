//! Catalog lookup capability.
//!
//! The cart consumes the product catalog, it does not own it: callers
//! resolve a product through `CatalogLookup` before constructing an
//! `AddItem` intent. The production catalog lives behind the product
//! API; `StaticCatalog` serves seeded data for development and tests.

use crate::types::{Product, ProductId};
use std::collections::HashMap;

/// Product catalog lookup
pub trait CatalogLookup: Send + Sync {
    /// Resolve a product by id, or `None` when it does not exist
    fn product(&self, id: ProductId) -> Option<Product>;
}

/// In-memory catalog seeded from a fixed product list
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    products: HashMap<ProductId, Product>,
}

impl StaticCatalog {
    /// Build a catalog from a product list
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.id, product))
                .collect(),
        }
    }

    /// Number of products in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogLookup for StaticCatalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).cloned()
    }
}
