//! Marketplace and product rollups — one derived row per sub-dimension of a
//! parent offer.

use marketpulse_core::catalog::{MarketplaceCatalog, ProductCatalog};
use marketpulse_core::offer::Offer;
use serde::{Deserialize, Serialize};

use crate::synth::{pair_id, synth_range};

/// Listing health of an offer on one marketplace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Inactive,
    NotListed,
}

impl ListingStatus {
    fn volume_multiplier(&self) -> f64 {
        match self {
            ListingStatus::Active => 1.0,
            ListingStatus::Inactive => 0.1,
            ListingStatus::NotListed => 0.0,
        }
    }
}

/// Derived metrics for one offer on one catalog marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceAnalytics {
    pub marketplace_id: String,
    pub marketplace_name: String,
    pub status: ListingStatus,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
    pub conversion_rate: f64,
    pub ad_spend: f64,
    pub roas: f64,
}

/// Derived metrics for one offer on one linked product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalytics {
    pub product_id: String,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
    pub conversion_rate: f64,
}

/// Roll an offer up across the full marketplace catalog.
///
/// Iterates every catalog entry, not just the offer's assigned marketplaces,
/// so unassigned marketplaces are explicitly representable as `not_listed`.
/// The listed check reads strictly `offer.marketplaces`; the summary
/// filter's default-marketplace fallback does not apply here.
pub fn build_marketplace_rollup(
    offer: &Offer,
    offer_index: usize,
    catalog: &MarketplaceCatalog,
) -> Vec<MarketplaceAnalytics> {
    catalog
        .entries()
        .iter()
        .enumerate()
        .map(|(j, marketplace)| {
            let is_listed = offer.marketplaces.iter().any(|m| m == &marketplace.id);
            let status = if !is_listed {
                ListingStatus::NotListed
            } else if synth_range(&pair_id(&offer.id, &marketplace.id), j as u64, 0, 10) > 2 {
                // 8-in-10 draw: a listed offer can still be momentarily
                // inactive, modeling listing-health variance.
                ListingStatus::Active
            } else {
                ListingStatus::Inactive
            };

            let id = pair_id(&offer.id, &marketplace.id);
            let salt = ((offer_index + 1) * (j + 1)) as u64;
            let funnel = synth_funnel(&id, salt, status.volume_multiplier());

            MarketplaceAnalytics {
                marketplace_id: marketplace.id.clone(),
                marketplace_name: marketplace.name.clone(),
                status,
                impressions: funnel.impressions,
                clicks: funnel.clicks,
                conversions: funnel.conversions,
                revenue: funnel.revenue,
                conversion_rate: funnel.conversion_rate,
                ad_spend: funnel.ad_spend,
                roas: funnel.roas,
            }
        })
        .collect()
}

/// Roll an offer up across its linked products, decorated from the product
/// catalog. There is no status dimension: product rows always synthesize at
/// full volume.
pub fn build_product_rollup(
    offer: &Offer,
    offer_index: usize,
    products: &ProductCatalog,
) -> Vec<ProductAnalytics> {
    offer
        .product_ids
        .iter()
        .enumerate()
        .map(|(p, product_id)| {
            let id = pair_id(&offer.id, product_id);
            let salt = ((offer_index + 1) * (p + 1)) as u64;
            let funnel = synth_funnel(&id, salt, 1.0);
            let product = products.get(product_id);

            ProductAnalytics {
                product_id: product_id.clone(),
                product_name: product.map(|p| p.name.clone()),
                sku: product.map(|p| p.sku.clone()),
                image_url: product.and_then(|p| p.image_url.clone()),
                impressions: funnel.impressions,
                clicks: funnel.clicks,
                conversions: funnel.conversions,
                revenue: funnel.revenue,
                conversion_rate: funnel.conversion_rate,
            }
        })
        .collect()
}

struct FunnelDraw {
    impressions: u64,
    clicks: u64,
    conversions: u64,
    revenue: f64,
    conversion_rate: f64,
    ad_spend: f64,
    roas: f64,
}

/// Shared funnel formulas for paired-entity rows, mirroring the per-offer
/// builder's ranges.
fn synth_funnel(id: &str, salt: u64, multiplier: f64) -> FunnelDraw {
    let impressions = (synth_range(id, salt, 5000, 50000) as f64 * multiplier).floor() as u64;
    let clicks =
        (impressions as f64 * synth_range(id, salt, 5, 15) as f64 / 100.0).floor() as u64;
    let conversions =
        (clicks as f64 * synth_range(id, salt, 3, 12) as f64 / 100.0).floor() as u64;
    let revenue = conversions as f64 * synth_range(id, salt, 25, 150) as f64;
    let ad_spend = synth_range(id, salt, 100, 2000) as f64 * multiplier;
    let roas = if ad_spend > 0.0 { revenue / ad_spend } else { 0.0 };
    let conversion_rate = if clicks > 0 {
        conversions as f64 / clicks as f64 * 100.0
    } else {
        0.0
    };

    FunnelDraw {
        impressions,
        clicks,
        conversions,
        revenue,
        conversion_rate,
        ad_spend,
        roas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketpulse_core::catalog::{Product, ProductCatalog};
    use marketpulse_core::offer::{OfferKind, OfferScope};
    use chrono::{Duration, TimeZone, Utc};

    fn fixture_offer(marketplaces: Vec<&str>, product_ids: Vec<&str>) -> Offer {
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        Offer {
            id: "offer-roll".to_string(),
            name: "Rollup fixture".to_string(),
            kind: OfferKind::PercentDiscount { percent: 20.0 },
            scope: OfferScope::Marketplace,
            start_date: now - Duration::days(10),
            end_date: now + Duration::days(30),
            marketplaces: marketplaces.into_iter().map(String::from).collect(),
            product_ids: product_ids.into_iter().map(String::from).collect(),
            is_active: true,
        }
    }

    #[test]
    fn test_rollup_is_exhaustive_over_catalog() {
        let catalog = MarketplaceCatalog::reference();
        let offer = fixture_offer(vec!["amazon_us", "ebay"], vec![]);
        let rollup = build_marketplace_rollup(&offer, 0, &catalog);
        assert_eq!(rollup.len(), catalog.len());
    }

    #[test]
    fn test_unassigned_marketplaces_are_not_listed_with_zero_volume() {
        let catalog = MarketplaceCatalog::reference();
        let offer = fixture_offer(vec!["ebay"], vec![]);
        let rollup = build_marketplace_rollup(&offer, 0, &catalog);

        for row in rollup.iter().filter(|r| r.marketplace_id != "ebay") {
            assert_eq!(row.status, ListingStatus::NotListed);
            assert_eq!(row.impressions, 0);
            assert_eq!(row.clicks, 0);
            assert_eq!(row.conversions, 0);
            assert_eq!(row.revenue, 0.0);
            assert_eq!(row.conversion_rate, 0.0);
            assert_eq!(row.ad_spend, 0.0);
            assert_eq!(row.roas, 0.0);
        }
        let listed = rollup.iter().find(|r| r.marketplace_id == "ebay").unwrap();
        assert_ne!(listed.status, ListingStatus::NotListed);
    }

    #[test]
    fn test_empty_marketplaces_never_fall_back_in_rollup() {
        // The first-3 default applies to summary filter matching only; the
        // rollup listed check reads the offer's own marketplace set.
        let catalog = MarketplaceCatalog::reference();
        let offer = fixture_offer(vec![], vec![]);
        let rollup = build_marketplace_rollup(&offer, 0, &catalog);
        assert_eq!(rollup.len(), 10);
        assert!(rollup.iter().all(|r| r.status == ListingStatus::NotListed));
        assert!(rollup.iter().all(|r| r.impressions == 0));
    }

    #[test]
    fn test_rollup_rows_decorrelate_across_marketplaces() {
        let catalog = MarketplaceCatalog::reference();
        let all: Vec<String> = catalog.entries().iter().map(|m| m.id.clone()).collect();
        let mut offer = fixture_offer(vec![], vec![]);
        offer.marketplaces = all;

        let rollup = build_marketplace_rollup(&offer, 1, &catalog);
        let active_impressions: Vec<u64> = rollup
            .iter()
            .filter(|r| r.status == ListingStatus::Active)
            .map(|r| r.impressions)
            .collect();
        let distinct: std::collections::HashSet<_> = active_impressions.iter().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_product_rollup_restricted_to_linked_products() {
        let products = ProductCatalog::from_products(vec![Product {
            id: "prod-1".to_string(),
            name: "Walnut Desk Organizer".to_string(),
            sku: "WDO-100".to_string(),
            image_url: None,
        }]);

        let offer = fixture_offer(vec![], vec!["prod-1", "prod-2"]);
        let rollup = build_product_rollup(&offer, 0, &products);

        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].product_name.as_deref(), Some("Walnut Desk Organizer"));
        // Unknown products still roll up, just undecorated.
        assert_eq!(rollup[1].product_name, None);
        for row in &rollup {
            assert!(row.conversions <= row.clicks);
            assert!(row.clicks <= row.impressions);
            assert!(row.impressions > 0);
        }

        let empty = fixture_offer(vec![], vec![]);
        assert!(build_product_rollup(&empty, 0, &products).is_empty());
    }
}
