//! Dashboard KPI aggregation over the offer analytics and rollups.

use chrono::{DateTime, Utc};
use marketpulse_core::catalog::MarketplaceCatalog;
use marketpulse_core::offer::Offer;
use marketpulse_core::status::classify;
use serde::{Deserialize, Serialize};

use crate::offer_metrics::OfferAnalytics;
use crate::rollup::{build_marketplace_rollup, ListingStatus};

/// Aggregated dashboard KPIs for one (offer set, marketplace filter) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub active_offers: u64,
    pub total_offers: u64,
    pub total_revenue: f64,
    pub total_revenue_impact: f64,
    pub total_conversions: u64,
    pub total_clicks: u64,
    pub total_impressions: u64,
    pub avg_conversion_rate: f64,
    pub avg_roi: f64,
    pub click_through_rate: f64,
    pub total_ad_spend: f64,
    pub avg_roas: f64,
}

/// Offers passing the marketplace filter, keyed by their position in the
/// original list so rollup seeding stays aligned with the analytics list.
///
/// An offer with no marketplaces stands in with the catalog's default filter
/// set for matching purposes.
pub fn filter_offers<'a>(
    offers: &'a [Offer],
    filter: &[String],
    catalog: &MarketplaceCatalog,
) -> Vec<(usize, &'a Offer)> {
    offers
        .iter()
        .enumerate()
        .filter(|(_, offer)| offer_matches_filter(offer, filter, catalog))
        .collect()
}

fn offer_matches_filter(offer: &Offer, filter: &[String], catalog: &MarketplaceCatalog) -> bool {
    if filter.is_empty() {
        return true;
    }
    if offer.marketplaces.is_empty() {
        return catalog
            .default_filter_set()
            .iter()
            .any(|m| filter.iter().any(|f| f == m));
    }
    offer
        .marketplaces
        .iter()
        .any(|m| filter.iter().any(|f| f == m))
}

/// Aggregate KPIs for the filtered offer set.
///
/// With no filter (or one covering the whole catalog) the totals come
/// straight from the offer-level analytics. A strict subset filter instead
/// sums only the filter's active-status rollup rows; `revenue_impact` is then
/// pro-rated by filter share per offer. That pro-rating is an approximation,
/// not a true per-marketplace split.
pub fn compute_summary(
    offers: &[Offer],
    analytics: &[OfferAnalytics],
    filter: &[String],
    catalog: &MarketplaceCatalog,
    now: DateTime<Utc>,
) -> SummaryMetrics {
    let filtered = filter_offers(offers, filter, catalog);
    let active: Vec<&(usize, &Offer)> = filtered
        .iter()
        .filter(|(_, offer)| classify(offer, now).counts_as_active())
        .collect();

    let full_coverage = filter.is_empty() || catalog.covered_by(filter);

    let mut total_revenue = 0.0;
    let mut total_revenue_impact = 0.0;
    let mut total_conversions = 0u64;
    let mut total_clicks = 0u64;
    let mut total_impressions = 0u64;
    let mut total_ad_spend = 0.0;

    if full_coverage {
        for (i, _) in &active {
            let a = &analytics[*i];
            total_revenue += a.revenue;
            total_revenue_impact += a.revenue_impact;
            total_conversions += a.conversions;
            total_clicks += a.clicks;
            total_impressions += a.impressions;
            total_ad_spend += a.ad_spend;
        }
    } else {
        let filter_share = filter.len() as f64 / catalog.len() as f64;
        for (i, offer) in &active {
            let rollup = build_marketplace_rollup(offer, *i, catalog);
            for row in rollup.iter().filter(|r| {
                r.status == ListingStatus::Active && filter.iter().any(|f| f == &r.marketplace_id)
            }) {
                total_revenue += row.revenue;
                total_conversions += row.conversions;
                total_clicks += row.clicks;
                total_impressions += row.impressions;
                total_ad_spend += row.ad_spend;
            }
            total_revenue_impact += analytics[*i].revenue_impact * filter_share;
        }
    }

    // ROI is never marketplace-scoped: both branches take the offer-level mean.
    let avg_roi = if active.is_empty() {
        0.0
    } else {
        active.iter().map(|(i, _)| analytics[*i].roi).sum::<f64>() / active.len() as f64
    };

    let avg_conversion_rate = if total_clicks > 0 {
        total_conversions as f64 / total_clicks as f64 * 100.0
    } else {
        0.0
    };
    let click_through_rate = if total_impressions > 0 {
        total_clicks as f64 / total_impressions as f64 * 100.0
    } else {
        0.0
    };
    let avg_roas = if total_ad_spend > 0.0 {
        total_revenue / total_ad_spend
    } else {
        0.0
    };

    SummaryMetrics {
        active_offers: active.len() as u64,
        total_offers: filtered.len() as u64,
        total_revenue,
        total_revenue_impact,
        total_conversions,
        total_clicks,
        total_impressions,
        avg_conversion_rate,
        avg_roi,
        click_through_rate,
        total_ad_spend,
        avg_roas,
    }
}
