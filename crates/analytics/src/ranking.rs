//! Ranking and distribution views for charts and tables.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use marketpulse_core::catalog::{MarketplaceCatalog, OfferTypeLabels};
use marketpulse_core::offer::Offer;
use marketpulse_core::status::{classify, LifecycleStatus};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::offer_metrics::OfferAnalytics;
use crate::summary::filter_offers;

/// Bar-chart entries returned by the chart ranking.
pub const CHART_RANKING_LEN: usize = 6;

/// Chart labels longer than this are truncated with an ellipsis.
pub const CHART_NAME_MAX_LEN: usize = 15;

/// Metric the ranking views sort by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    #[default]
    Revenue,
    Conversions,
    Roi,
}

/// One bar in the performance chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEntry {
    pub name: String,
    pub revenue: f64,
    pub conversions: u64,
    pub roi: f64,
}

/// One row in the offer detail table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub offer_id: String,
    pub name: String,
    pub type_label: String,
    pub status: LifecycleStatus,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    pub revenue: f64,
    pub roi: f64,
}

/// Offer count per display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub label: String,
    pub count: u64,
}

/// One point of the mock revenue trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

fn sort_value(analytics: &OfferAnalytics, key: RankKey, rounded: bool) -> f64 {
    match key {
        RankKey::Revenue => {
            if rounded {
                analytics.revenue.round()
            } else {
                analytics.revenue
            }
        }
        RankKey::Conversions => analytics.conversions as f64,
        RankKey::Roi => {
            if rounded {
                analytics.roi.round()
            } else {
                analytics.roi
            }
        }
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Top non-expired offers for the bar chart: sorted descending by the chosen
/// key, capped at six, names over fifteen characters truncated with an
/// ellipsis, revenue and ROI rounded to whole numbers.
pub fn chart_ranking(
    offers: &[Offer],
    analytics: &[OfferAnalytics],
    filter: &[String],
    key: RankKey,
    catalog: &MarketplaceCatalog,
    now: DateTime<Utc>,
) -> Vec<ChartEntry> {
    let mut entries: Vec<ChartEntry> = filter_offers(offers, filter, catalog)
        .into_iter()
        .filter(|(_, offer)| classify(offer, now) != LifecycleStatus::Expired)
        .map(|(i, offer)| {
            let a = &analytics[i];
            ChartEntry {
                name: truncate_name(&offer.name),
                revenue: a.revenue.round(),
                conversions: a.conversions,
                roi: a.roi.round(),
            }
        })
        .collect();

    entries.sort_by(|a, b| match key {
        RankKey::Revenue => desc(a.revenue, b.revenue),
        RankKey::Conversions => desc(a.conversions as f64, b.conversions as f64),
        RankKey::Roi => desc(a.roi, b.roi),
    });
    entries.truncate(CHART_RANKING_LEN);
    entries
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > CHART_NAME_MAX_LEN {
        let head: String = name.chars().take(CHART_NAME_MAX_LEN).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Full filtered offer list sorted descending by the chosen key. Callers
/// truncate for display (the detail table shows ten).
pub fn table_ranking(
    offers: &[Offer],
    analytics: &[OfferAnalytics],
    filter: &[String],
    key: RankKey,
    labels: &OfferTypeLabels,
    catalog: &MarketplaceCatalog,
    now: DateTime<Utc>,
) -> Vec<TableRow> {
    let mut rows: Vec<(f64, TableRow)> = filter_offers(offers, filter, catalog)
        .into_iter()
        .map(|(i, offer)| {
            let a = &analytics[i];
            let row = TableRow {
                offer_id: offer.id.clone(),
                name: offer.name.clone(),
                type_label: labels.label(&offer.kind).to_string(),
                status: classify(offer, now),
                impressions: a.impressions,
                clicks: a.clicks,
                conversions: a.conversions,
                conversion_rate: a.conversion_rate,
                revenue: a.revenue,
                roi: a.roi,
            };
            (sort_value(a, key, false), row)
        })
        .collect();

    rows.sort_by(|a, b| desc(a.0, b.0));
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Filtered offers counted by display label, in first-seen order.
pub fn type_distribution(
    offers: &[Offer],
    filter: &[String],
    labels: &OfferTypeLabels,
    catalog: &MarketplaceCatalog,
) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();
    for (_, offer) in filter_offers(offers, filter, catalog) {
        let label = labels.label(&offer.kind);
        match counts.iter_mut().find(|c| c.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(TypeCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// Mock revenue trend, newest point last.
///
/// Unlike every other series in the engine this one is intentionally
/// non-deterministic: each point is an independent random draw, so repeated
/// requests produce different curves. Callers must not cache-compare it.
pub fn revenue_trend(days: usize, max_days: usize, now: DateTime<Utc>) -> Vec<TrendPoint> {
    let len = days.min(max_days);
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|i| TrendPoint {
            date: (now - Duration::days((len - 1 - i) as i64)).date_naive(),
            revenue: rng.gen_range(1000.0_f64..6000.0).round(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer_metrics::build_offer_analytics;
    use marketpulse_core::offer::{OfferKind, OfferScope};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn offer(id: &str, name: &str, kind: OfferKind, expired: bool) -> Offer {
        let now = fixed_now();
        Offer {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            scope: OfferScope::Marketplace,
            start_date: now - Duration::days(40),
            end_date: if expired {
                now - Duration::days(1)
            } else {
                now + Duration::days(30)
            },
            marketplaces: vec!["amazon_us".to_string()],
            product_ids: vec![],
            is_active: true,
        }
    }

    fn fixture() -> (Vec<Offer>, Vec<OfferAnalytics>) {
        let kinds = [
            OfferKind::PercentDiscount { percent: 20.0 },
            OfferKind::FixedDiscount { amount: 5.0 },
            OfferKind::BogoFree {
                buy_qty: 1,
                get_qty: 1,
            },
        ];
        let offers: Vec<Offer> = (0..8)
            .map(|i| {
                offer(
                    &format!("offer-{i:02}"),
                    &format!("Long Running Promotion Number {i}"),
                    kinds[i % 3].clone(),
                    false,
                )
            })
            .collect();
        let analytics = offers
            .iter()
            .enumerate()
            .map(|(i, o)| build_offer_analytics(o, i, fixed_now()))
            .collect();
        (offers, analytics)
    }

    #[test]
    fn test_chart_ranking_caps_sorts_and_truncates() {
        let catalog = MarketplaceCatalog::reference();
        let (offers, analytics) = fixture();

        let chart = chart_ranking(&offers, &analytics, &[], RankKey::Roi, &catalog, fixed_now());

        assert_eq!(chart.len(), 6);
        for pair in chart.windows(2) {
            assert!(pair[0].roi >= pair[1].roi);
        }
        for entry in &chart {
            assert!(entry.name.ends_with("..."));
            assert_eq!(entry.roi, entry.roi.round());
            assert_eq!(entry.revenue, entry.revenue.round());
        }
    }

    #[test]
    fn test_chart_ranking_drops_expired() {
        let catalog = MarketplaceCatalog::reference();
        let offers = vec![
            offer(
                "offer-live",
                "Live",
                OfferKind::PercentDiscount { percent: 10.0 },
                false,
            ),
            offer(
                "offer-dead",
                "Dead",
                OfferKind::PercentDiscount { percent: 10.0 },
                true,
            ),
        ];
        let analytics: Vec<OfferAnalytics> = offers
            .iter()
            .enumerate()
            .map(|(i, o)| build_offer_analytics(o, i, fixed_now()))
            .collect();

        let chart = chart_ranking(
            &offers,
            &analytics,
            &[],
            RankKey::Revenue,
            &catalog,
            fixed_now(),
        );
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].name, "Live");
    }

    #[test]
    fn test_table_ranking_keeps_expired_and_sorts() {
        let catalog = MarketplaceCatalog::reference();
        let labels = OfferTypeLabels::default();
        let (offers, analytics) = fixture();

        let rows = table_ranking(
            &offers,
            &analytics,
            &[],
            RankKey::Revenue,
            &labels,
            &catalog,
            fixed_now(),
        );
        assert_eq!(rows.len(), 8);
        for pair in rows.windows(2) {
            assert!(pair[0].revenue >= pair[1].revenue);
        }
    }

    #[test]
    fn test_type_distribution_counts_by_label() {
        let catalog = MarketplaceCatalog::reference();
        let labels = OfferTypeLabels::default();
        let (offers, _) = fixture();

        let distribution = type_distribution(&offers, &[], &labels, &catalog);

        // 8 offers cycling through 3 kinds: 3 + 3 + 2.
        assert_eq!(distribution.len(), 3);
        assert_eq!(distribution[0].label, "Percentage Discount");
        assert_eq!(distribution[0].count, 3);
        assert_eq!(distribution[1].count, 3);
        assert_eq!(distribution[2].count, 2);
        let total: u64 = distribution.iter().map(|c| c.count).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_revenue_trend_is_capped_and_date_ordered() {
        let trend = revenue_trend(30, 14, fixed_now());
        assert_eq!(trend.len(), 14);
        for pair in trend.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for point in &trend {
            assert!((1000.0..=6000.0).contains(&point.revenue));
        }

        let short = revenue_trend(5, 14, fixed_now());
        assert_eq!(short.len(), 5);
        assert_eq!(short.last().unwrap().date, fixed_now().date_naive());
    }
}
