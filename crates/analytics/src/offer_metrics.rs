//! Per-offer funnel and financial metrics.

use chrono::{DateTime, Utc};
use marketpulse_core::offer::Offer;
use marketpulse_core::status::{classify, LifecycleStatus};
use serde::{Deserialize, Serialize};

use crate::synth::synth_range;

/// Volume share synthesized for offers outside their active window, so
/// historical dashboards stay populated instead of zeroing out.
const INACTIVE_VOLUME_SHARE: f64 = 0.3;

/// Derived performance metrics for a single offer. Recomputed on every
/// request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferAnalytics {
    pub offer_id: String,
    pub offer_name: String,
    pub status: LifecycleStatus,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    /// Conversions per click, percent. 0 when there are no clicks.
    pub conversion_rate: f64,
    pub revenue: f64,
    pub revenue_impact: f64,
    pub average_order_value: f64,
    pub cost_per_conversion: f64,
    /// Return relative to discount cost, percent. 0 when the discount costs
    /// nothing.
    pub roi: f64,
    pub ad_spend: f64,
    pub roas: f64,
}

/// Synthesize analytics for one offer at its position `index` in the list.
pub fn build_offer_analytics(offer: &Offer, index: usize, now: DateTime<Utc>) -> OfferAnalytics {
    let status = classify(offer, now);
    let multiplier = if status.counts_as_active() {
        1.0
    } else {
        INACTIVE_VOLUME_SHARE
    };
    let salt = index as u64;

    let impressions =
        (synth_range(&offer.id, salt, 5000, 50000) as f64 * multiplier).floor() as u64;
    let click_rate = synth_range(&offer.id, salt, 5, 15) as f64;
    let clicks = (impressions as f64 * click_rate / 100.0).floor() as u64;
    let conv_rate_draw = synth_range(&offer.id, salt, 3, 12) as f64;
    let conversions = (clicks as f64 * conv_rate_draw / 100.0).floor() as u64;

    let revenue = conversions as f64 * synth_range(&offer.id, salt, 25, 150) as f64;
    let revenue_impact = revenue * synth_range(&offer.id, salt, 10, 35) as f64 / 100.0;

    let average_order_value = if conversions > 0 {
        revenue / conversions as f64
    } else {
        0.0
    };

    let discount_cost = revenue * offer.effective_discount_percent() / 100.0;
    let cost_per_conversion = if conversions > 0 {
        discount_cost / conversions as f64
    } else {
        0.0
    };
    let roi = if discount_cost > 0.0 {
        (revenue_impact - discount_cost) / discount_cost * 100.0
    } else {
        0.0
    };

    let ad_spend = synth_range(&offer.id, salt, 100, 2000) as f64 * multiplier;
    let roas = if ad_spend > 0.0 { revenue / ad_spend } else { 0.0 };

    let conversion_rate = if clicks > 0 {
        conversions as f64 / clicks as f64 * 100.0
    } else {
        0.0
    };

    OfferAnalytics {
        offer_id: offer.id.clone(),
        offer_name: offer.name.clone(),
        status,
        impressions,
        clicks,
        conversions,
        conversion_rate,
        revenue,
        revenue_impact,
        average_order_value,
        cost_per_conversion,
        roi,
        ad_spend,
        roas,
    }
}
