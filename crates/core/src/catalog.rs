//! Fixed catalogs injected into the analytics engine — the marketplace list,
//! the product lookup, and the offer-type display labels. Passed explicitly
//! at construction so the engine stays a pure function of its inputs.

use crate::offer::OfferKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Marketplaces ───────────────────────────────────────────────────────────

/// A marketplace an offer can be listed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marketplace {
    pub id: String,
    pub name: String,
    pub region: String,
}

/// The fixed, ordered marketplace catalog shared by the rollup builders and
/// the dashboard filter.
///
/// `default_filter_len` controls the default filter policy: when an offer
/// lists no marketplaces, the summary filter treats it as listed on the
/// catalog's leading `default_filter_len` entries. Rollup "listed"
/// determination never consults this policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceCatalog {
    marketplaces: Vec<Marketplace>,
    default_filter_len: usize,
}

impl MarketplaceCatalog {
    pub fn new(marketplaces: Vec<Marketplace>, default_filter_len: usize) -> Self {
        Self {
            marketplaces,
            default_filter_len,
        }
    }

    /// The reference catalog: ten marketplaces, default filter policy of 3.
    pub fn reference() -> Self {
        let entries = [
            ("amazon_us", "Amazon US", "North America"),
            ("amazon_uk", "Amazon UK", "Europe"),
            ("amazon_de", "Amazon DE", "Europe"),
            ("ebay", "eBay", "Global"),
            ("walmart", "Walmart Marketplace", "North America"),
            ("etsy", "Etsy", "Global"),
            ("target_plus", "Target Plus", "North America"),
            ("wayfair", "Wayfair", "North America"),
            ("newegg", "Newegg", "North America"),
            ("rakuten", "Rakuten", "Asia"),
        ];
        Self::new(
            entries
                .iter()
                .map(|(id, name, region)| Marketplace {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    region: (*region).to_string(),
                })
                .collect(),
            3,
        )
    }

    /// Override the default filter policy length.
    pub fn with_default_filter_len(mut self, len: usize) -> Self {
        self.default_filter_len = len;
        self
    }

    pub fn entries(&self) -> &[Marketplace] {
        &self.marketplaces
    }

    pub fn len(&self) -> usize {
        self.marketplaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marketplaces.is_empty()
    }

    /// Stand-in marketplace ids for an offer that lists none, used only for
    /// summary filter matching.
    pub fn default_filter_set(&self) -> Vec<&str> {
        self.marketplaces
            .iter()
            .take(self.default_filter_len)
            .map(|m| m.id.as_str())
            .collect()
    }

    /// Whether a filter selects every marketplace in the catalog.
    pub fn covered_by(&self, filter: &[String]) -> bool {
        self.marketplaces
            .iter()
            .all(|m| filter.iter().any(|f| f == &m.id))
    }
}

// ─── Products ───────────────────────────────────────────────────────────────

/// Display fields for a catalog product, used to decorate product rollups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub image_url: Option<String>,
}

/// Keyed product lookup.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: HashMap<String, Product>,
}

impl ProductCatalog {
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// ─── Offer type labels ──────────────────────────────────────────────────────

/// Display labels for the six offer mechanics, injected alongside the
/// marketplace catalog so presentation strings never live inside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferTypeLabels {
    pub percent_discount: String,
    pub fixed_discount: String,
    pub quantity_discount: String,
    pub bulk_purchase: String,
    pub bogo_half: String,
    pub bogo_free: String,
}

impl OfferTypeLabels {
    pub fn label(&self, kind: &OfferKind) -> &str {
        match kind {
            OfferKind::PercentDiscount { .. } => &self.percent_discount,
            OfferKind::FixedDiscount { .. } => &self.fixed_discount,
            OfferKind::QuantityDiscount { .. } => &self.quantity_discount,
            OfferKind::BulkPurchase { .. } => &self.bulk_purchase,
            OfferKind::BogoHalf { .. } => &self.bogo_half,
            OfferKind::BogoFree { .. } => &self.bogo_free,
        }
    }
}

impl Default for OfferTypeLabels {
    fn default() -> Self {
        Self {
            percent_discount: "Percentage Discount".to_string(),
            fixed_discount: "Fixed Amount Off".to_string(),
            quantity_discount: "Quantity Discount".to_string(),
            bulk_purchase: "Bulk Purchase".to_string(),
            bogo_half: "Buy One Get One 50% Off".to_string(),
            bogo_free: "Buy One Get One Free".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog_shape() {
        let catalog = MarketplaceCatalog::reference();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.default_filter_set(), vec!["amazon_us", "amazon_uk", "amazon_de"]);
    }

    #[test]
    fn test_covered_by() {
        let catalog = MarketplaceCatalog::reference();
        let all: Vec<String> = catalog.entries().iter().map(|m| m.id.clone()).collect();
        assert!(catalog.covered_by(&all));
        assert!(!catalog.covered_by(&all[..4].to_vec()));
        assert!(!catalog.covered_by(&[]));
    }
}
