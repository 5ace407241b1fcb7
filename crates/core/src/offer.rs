//! Promotional offer domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A promotional offer attached to one or more marketplace listings.
///
/// Offers are consumed read-only by the analytics engine; the store in
/// `marketpulse-management` owns their lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: OfferKind,
    pub scope: OfferScope,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Marketplace ids this offer is listed on. May be empty; the summary
    /// filter falls back to the catalog's default filter set in that case.
    #[serde(default)]
    pub marketplaces: Vec<String>,
    /// Linked product ids. Empty yields zero product rollup rows.
    #[serde(default)]
    pub product_ids: Vec<String>,
    pub is_active: bool,
}

impl Offer {
    /// Discount percent used for cost modelling, falling back to 10 when the
    /// offer kind carries no percentage.
    pub fn effective_discount_percent(&self) -> f64 {
        self.kind.discount_percent().unwrap_or(10.0)
    }
}

/// Closed set of offer mechanics. Each variant carries exactly the discount
/// fields that are meaningful for it, so field interpretation is checked
/// exhaustively at compile time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferKind {
    PercentDiscount { percent: f64 },
    FixedDiscount { amount: f64 },
    QuantityDiscount { percent: f64, min_qty: u32 },
    BulkPurchase { amount: f64, min_qty: u32 },
    BogoHalf { buy_qty: u32, get_qty: u32 },
    BogoFree { buy_qty: u32, get_qty: u32 },
}

impl OfferKind {
    /// Percentage discount where the mechanic defines one.
    pub fn discount_percent(&self) -> Option<f64> {
        match self {
            OfferKind::PercentDiscount { percent } => Some(*percent),
            OfferKind::QuantityDiscount { percent, .. } => Some(*percent),
            OfferKind::FixedDiscount { .. }
            | OfferKind::BulkPurchase { .. }
            | OfferKind::BogoHalf { .. }
            | OfferKind::BogoFree { .. } => None,
        }
    }

    /// Fixed currency discount where the mechanic defines one.
    pub fn discount_amount(&self) -> Option<f64> {
        match self {
            OfferKind::FixedDiscount { amount } => Some(*amount),
            OfferKind::BulkPurchase { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

/// Whether an offer targets individual products or whole marketplaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OfferScope {
    Product,
    Marketplace,
}
