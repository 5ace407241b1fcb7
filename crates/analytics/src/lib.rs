//! Offer performance analytics and alerting engine.
//!
//! Synthesizes reproducible performance metrics for promotional offers, rolls
//! them up per offer / marketplace / product, aggregates dashboard KPIs, and
//! evaluates a fixed rule set that flags under- and over-performing offers.
//! Pure, synchronous, stateless: every result is a function of the offer
//! snapshot, the injected catalogs, the filter, and `now` — nothing is cached
//! or persisted, so output is always consistent with the current offer list.

pub mod alerts;
pub mod offer_metrics;
pub mod ranking;
pub mod rollup;
pub mod summary;
pub mod synth;

pub use alerts::{AlertAction, AlertSeverity, PerformanceAlert};
pub use offer_metrics::OfferAnalytics;
pub use ranking::{ChartEntry, RankKey, TableRow, TrendPoint, TypeCount};
pub use rollup::{ListingStatus, MarketplaceAnalytics, ProductAnalytics};
pub use summary::SummaryMetrics;

use chrono::{DateTime, Utc};
use marketpulse_core::catalog::{MarketplaceCatalog, OfferTypeLabels, ProductCatalog};
use marketpulse_core::config::EngineConfig;
use marketpulse_core::offer::Offer;

/// Facade over the analytics modules, holding the injected immutable
/// catalogs. Construct once and share freely; the engine has no interior
/// state, so concurrent use is safe by construction.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    marketplaces: MarketplaceCatalog,
    products: ProductCatalog,
    type_labels: OfferTypeLabels,
    trend_max_days: usize,
}

impl AnalyticsEngine {
    pub fn new(
        marketplaces: MarketplaceCatalog,
        products: ProductCatalog,
        type_labels: OfferTypeLabels,
        config: &EngineConfig,
    ) -> Self {
        Self {
            marketplaces,
            products,
            type_labels,
            trend_max_days: config.trend_max_days,
        }
    }

    pub fn marketplaces(&self) -> &MarketplaceCatalog {
        &self.marketplaces
    }

    /// Per-offer funnel and financial metrics for the whole snapshot, in
    /// list order.
    pub fn offer_analytics(&self, offers: &[Offer], now: DateTime<Utc>) -> Vec<OfferAnalytics> {
        offers
            .iter()
            .enumerate()
            .map(|(i, offer)| offer_metrics::build_offer_analytics(offer, i, now))
            .collect()
    }

    /// Marketplace rollup for one offer: exactly one row per catalog entry.
    pub fn marketplace_rollup(
        &self,
        offer: &Offer,
        offer_index: usize,
    ) -> Vec<MarketplaceAnalytics> {
        rollup::build_marketplace_rollup(offer, offer_index, &self.marketplaces)
    }

    /// Product rollup for one offer, restricted to its linked products.
    pub fn product_rollup(&self, offer: &Offer, offer_index: usize) -> Vec<ProductAnalytics> {
        rollup::build_product_rollup(offer, offer_index, &self.products)
    }

    /// Dashboard KPIs for the filtered offer set.
    pub fn summary(
        &self,
        offers: &[Offer],
        analytics: &[OfferAnalytics],
        filter: &[String],
        now: DateTime<Utc>,
    ) -> SummaryMetrics {
        summary::compute_summary(offers, analytics, filter, &self.marketplaces, now)
    }

    /// Rule-based alerts over the filtered active offers against the
    /// summary's baselines, sorted by severity.
    pub fn alerts(
        &self,
        offers: &[Offer],
        analytics: &[OfferAnalytics],
        summary: &SummaryMetrics,
        filter: &[String],
        now: DateTime<Utc>,
    ) -> Vec<PerformanceAlert> {
        alerts::compute_alerts(offers, analytics, summary, filter, &self.marketplaces, now)
    }

    /// Top six non-expired offers for the bar chart.
    pub fn chart_ranking(
        &self,
        offers: &[Offer],
        analytics: &[OfferAnalytics],
        filter: &[String],
        key: RankKey,
        now: DateTime<Utc>,
    ) -> Vec<ChartEntry> {
        ranking::chart_ranking(offers, analytics, filter, key, &self.marketplaces, now)
    }

    /// Full sorted detail-table rows for the filtered offer set.
    pub fn table_ranking(
        &self,
        offers: &[Offer],
        analytics: &[OfferAnalytics],
        filter: &[String],
        key: RankKey,
        now: DateTime<Utc>,
    ) -> Vec<TableRow> {
        ranking::table_ranking(
            offers,
            analytics,
            filter,
            key,
            &self.type_labels,
            &self.marketplaces,
            now,
        )
    }

    /// Filtered offer counts by display label.
    pub fn type_distribution(&self, offers: &[Offer], filter: &[String]) -> Vec<TypeCount> {
        ranking::type_distribution(offers, filter, &self.type_labels, &self.marketplaces)
    }

    /// Mock revenue trend series. Intentionally non-deterministic, see
    /// [`ranking::revenue_trend`].
    pub fn revenue_trend(&self, days: usize, now: DateTime<Utc>) -> Vec<TrendPoint> {
        ranking::revenue_trend(days, self.trend_max_days, now)
    }
}
