//! Request types for the offer store.

use chrono::{DateTime, Utc};
use marketpulse_core::offer::{OfferKind, OfferScope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOfferRequest {
    pub name: String,
    #[serde(flatten)]
    pub kind: OfferKind,
    pub scope: OfferScope,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub marketplaces: Vec<String>,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOfferRequest {
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: Option<OfferKind>,
    pub scope: Option<OfferScope>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub marketplaces: Option<Vec<String>>,
    pub product_ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
