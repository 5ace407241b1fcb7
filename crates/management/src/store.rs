//! In-memory offer store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing. The
//! analytics engine only ever sees snapshots from `list_offers`, so it can be
//! re-invoked immediately after any mutation.

use crate::models::{CreateOfferRequest, UpdateOfferRequest};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use marketpulse_core::offer::{Offer, OfferKind, OfferScope};
use tracing::info;
use uuid::Uuid;

/// Thread-safe in-memory store for promotional offers.
pub struct OfferStore {
    offers: DashMap<String, Offer>,
}

impl OfferStore {
    pub fn new() -> Self {
        info!("Offer store initialized (in-memory, development mode)");
        let store = Self {
            offers: DashMap::new(),
        };
        store.seed_demo_data();
        store
    }

    /// Empty store for tests.
    pub fn empty() -> Self {
        Self {
            offers: DashMap::new(),
        }
    }

    /// Snapshot of all offers in a stable order. The analytics engine seeds
    /// per-offer streams by list position, so ordering must not depend on
    /// map iteration order.
    pub fn list_offers(&self) -> Vec<Offer> {
        let mut offers: Vec<Offer> = self.offers.iter().map(|r| r.value().clone()).collect();
        offers.sort_by(|a, b| a.id.cmp(&b.id));
        offers
    }

    pub fn get_offer(&self, id: &str) -> Option<Offer> {
        self.offers.get(id).map(|r| r.value().clone())
    }

    pub fn create_offer(&self, req: CreateOfferRequest) -> Offer {
        let offer = Offer {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            kind: req.kind,
            scope: req.scope,
            start_date: req.start_date,
            end_date: req.end_date,
            marketplaces: req.marketplaces,
            product_ids: req.product_ids,
            is_active: req.is_active,
        };
        info!(offer_id = %offer.id, name = %offer.name, "Offer created");
        self.offers.insert(offer.id.clone(), offer.clone());
        offer
    }

    pub fn update_offer(&self, id: &str, req: UpdateOfferRequest) -> Option<Offer> {
        self.offers.get_mut(id).map(|mut entry| {
            let offer = entry.value_mut();
            if let Some(name) = req.name {
                offer.name = name;
            }
            if let Some(kind) = req.kind {
                offer.kind = kind;
            }
            if let Some(scope) = req.scope {
                offer.scope = scope;
            }
            if let Some(start) = req.start_date {
                offer.start_date = start;
            }
            if let Some(end) = req.end_date {
                offer.end_date = end;
            }
            if let Some(marketplaces) = req.marketplaces {
                offer.marketplaces = marketplaces;
            }
            if let Some(product_ids) = req.product_ids {
                offer.product_ids = product_ids;
            }
            if let Some(is_active) = req.is_active {
                offer.is_active = is_active;
            }
            info!(offer_id = %id, "Offer updated");
            offer.clone()
        })
    }

    pub fn delete_offer(&self, id: &str) -> bool {
        let removed = self.offers.remove(id).is_some();
        if removed {
            info!(offer_id = %id, "Offer deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    fn seed_demo_data(&self) {
        let now = Utc::now();
        let seeds = vec![
            Offer {
                id: "offer-001".to_string(),
                name: "Summer Electronics Sale".to_string(),
                kind: OfferKind::PercentDiscount { percent: 20.0 },
                scope: OfferScope::Marketplace,
                start_date: now - Duration::days(20),
                end_date: now + Duration::days(25),
                marketplaces: vec!["amazon_us".to_string(), "ebay".to_string()],
                product_ids: vec!["prod-101".to_string(), "prod-102".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-002".to_string(),
                name: "Home Office Bundle".to_string(),
                kind: OfferKind::FixedDiscount { amount: 15.0 },
                scope: OfferScope::Product,
                start_date: now - Duration::days(10),
                end_date: now + Duration::days(5),
                marketplaces: vec!["walmart".to_string()],
                product_ids: vec!["prod-103".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-003".to_string(),
                name: "Buy Two Save More".to_string(),
                kind: OfferKind::QuantityDiscount {
                    percent: 10.0,
                    min_qty: 2,
                },
                scope: OfferScope::Product,
                start_date: now - Duration::days(2),
                end_date: now + Duration::days(40),
                marketplaces: vec!["amazon_us".to_string(), "amazon_uk".to_string()],
                product_ids: vec!["prod-104".to_string(), "prod-105".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-004".to_string(),
                name: "Warehouse Bulk Clearance".to_string(),
                kind: OfferKind::BulkPurchase {
                    amount: 50.0,
                    min_qty: 10,
                },
                scope: OfferScope::Marketplace,
                start_date: now - Duration::days(60),
                end_date: now - Duration::days(5),
                marketplaces: vec!["newegg".to_string()],
                product_ids: vec![],
                is_active: true,
            },
            Offer {
                id: "offer-005".to_string(),
                name: "Spring BOGO Kitchenware".to_string(),
                kind: OfferKind::BogoHalf {
                    buy_qty: 1,
                    get_qty: 1,
                },
                scope: OfferScope::Product,
                start_date: now + Duration::days(7),
                end_date: now + Duration::days(30),
                marketplaces: vec!["etsy".to_string(), "wayfair".to_string()],
                product_ids: vec!["prod-106".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-006".to_string(),
                name: "Free Gift With Purchase".to_string(),
                kind: OfferKind::BogoFree {
                    buy_qty: 2,
                    get_qty: 1,
                },
                scope: OfferScope::Product,
                start_date: now - Duration::days(15),
                end_date: now + Duration::days(3),
                marketplaces: vec![],
                product_ids: vec!["prod-107".to_string(), "prod-108".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-007".to_string(),
                name: "Paused Holiday Preview".to_string(),
                kind: OfferKind::PercentDiscount { percent: 30.0 },
                scope: OfferScope::Marketplace,
                start_date: now - Duration::days(5),
                end_date: now + Duration::days(50),
                marketplaces: vec!["rakuten".to_string(), "target_plus".to_string()],
                product_ids: vec![],
                is_active: false,
            },
        ];

        for offer in seeds {
            self.offers.insert(offer.id.clone(), offer);
        }
        info!(count = self.offers.len(), "Seeded demo offers");
    }
}

impl Default for OfferStore {
    fn default() -> Self {
        Self::new()
    }
}
