//! Performance alert rules.
//!
//! A fixed, ordered rule set evaluated once per computation cycle over every
//! filtered active offer, using the just-computed summary as its baseline.
//! Alert ids are stable per (rule, offer), so recomputation is idempotent.

use chrono::{DateTime, Utc};
use marketpulse_core::catalog::MarketplaceCatalog;
use marketpulse_core::offer::Offer;
use marketpulse_core::status::{classify, days_remaining, LifecycleStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::offer_metrics::OfferAnalytics;
use crate::summary::{filter_offers, SummaryMetrics};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
    Success,
}

impl AlertSeverity {
    /// Sort priority for the final alert list. Lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            AlertSeverity::Critical => 0,
            AlertSeverity::Warning => 1,
            AlertSeverity::Info => 2,
            AlertSeverity::Success => 3,
        }
    }
}

/// Suggested operator response carried on an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    Extend,
    Review,
    Adjust,
    Promote,
}

/// A typed alert for one offer. Ephemeral: one set is recomputed per
/// evaluation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceAlert {
    /// Stable per offer and rule: `<rule-tag>-<offer-id>`.
    pub id: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub offer_id: String,
    pub metric: Option<String>,
    pub action: Option<AlertAction>,
}

/// Evaluate the rule set and return alerts sorted by severity priority,
/// ties keeping (offer, rule) emission order.
pub fn compute_alerts(
    offers: &[Offer],
    analytics: &[OfferAnalytics],
    summary: &SummaryMetrics,
    filter: &[String],
    catalog: &MarketplaceCatalog,
    now: DateTime<Utc>,
) -> Vec<PerformanceAlert> {
    let baseline_cr = summary.avg_conversion_rate;
    let baseline_roi = summary.avg_roi;
    let mut alerts = Vec::new();

    for (i, offer) in filter_offers(offers, filter, catalog) {
        let status = classify(offer, now);
        if !status.counts_as_active() {
            continue;
        }
        let a = &analytics[i];
        let remaining = days_remaining(offer, now);

        if status == LifecycleStatus::EndingSoon && a.conversion_rate > baseline_cr * 1.2 {
            alerts.push(PerformanceAlert {
                id: format!("ending-soon-{}", offer.id),
                severity: AlertSeverity::Warning,
                title: "High performer ending soon".to_string(),
                description: format!(
                    "\"{}\" converts at {:.1}% and ends in {} days. Consider extending it.",
                    offer.name, a.conversion_rate, remaining
                ),
                offer_id: offer.id.clone(),
                metric: Some(format!("{:.1}% conversion rate", a.conversion_rate)),
                action: Some(AlertAction::Extend),
            });
        }

        if a.conversion_rate < baseline_cr * 0.5 && a.impressions > 1000 {
            alerts.push(PerformanceAlert {
                id: format!("low-conversion-{}", offer.id),
                severity: AlertSeverity::Critical,
                title: "Conversion rate well below average".to_string(),
                description: format!(
                    "\"{}\" converts at {:.1}% against a {:.1}% average despite {} impressions.",
                    offer.name, a.conversion_rate, baseline_cr, a.impressions
                ),
                offer_id: offer.id.clone(),
                metric: Some(format!("{:.1}% conversion rate", a.conversion_rate)),
                action: Some(AlertAction::Review),
            });
        }

        if a.roi < 0.0 {
            alerts.push(PerformanceAlert {
                id: format!("negative-roi-{}", offer.id),
                severity: AlertSeverity::Critical,
                title: "Negative return on discount".to_string(),
                description: format!(
                    "\"{}\" is running at {:.0}% ROI. The discount cost outweighs its measured impact.",
                    offer.name, a.roi
                ),
                offer_id: offer.id.clone(),
                metric: Some(format!("{:.0}% ROI", a.roi)),
                action: Some(AlertAction::Adjust),
            });
        }

        if a.conversion_rate > baseline_cr * 1.5 && a.roi > baseline_roi * 1.5 {
            alerts.push(PerformanceAlert {
                id: format!("top-performer-{}", offer.id),
                severity: AlertSeverity::Success,
                title: "Top performer".to_string(),
                description: format!(
                    "\"{}\" leads the board at {:.1}% conversion and {:.0}% ROI.",
                    offer.name, a.conversion_rate, a.roi
                ),
                offer_id: offer.id.clone(),
                metric: Some(format!("{:.1}% conversion rate", a.conversion_rate)),
                action: None,
            });
        }

        if a.impressions < 500 && remaining < 7 {
            alerts.push(PerformanceAlert {
                id: format!("low-visibility-{}", offer.id),
                severity: AlertSeverity::Info,
                title: "Low visibility".to_string(),
                description: format!(
                    "\"{}\" has only {} impressions with {} days left. Consider promoting it.",
                    offer.name, a.impressions, remaining
                ),
                offer_id: offer.id.clone(),
                metric: Some(format!("{} impressions", a.impressions)),
                action: Some(AlertAction::Promote),
            });
        }
    }

    debug!(count = alerts.len(), "Alert evaluation complete");

    // Stable, so ties keep emission order.
    alerts.sort_by_key(|a| a.severity.priority());
    alerts
}
