//! Offer lifecycle classification — pure functions of an offer's date range
//! and active flag.

use crate::offer::Offer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days after the start date during which an offer reads as freshly created.
pub const JUST_CREATED_WINDOW_DAYS: i64 = 3;

/// Days before the end date during which an offer reads as ending soon.
pub const ENDING_SOON_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Scheduled,
    JustCreated,
    Active,
    EndingSoon,
    Expired,
}

impl LifecycleStatus {
    /// Statuses that contribute full-volume analytics and are eligible for
    /// alert evaluation.
    pub fn counts_as_active(&self) -> bool {
        matches!(
            self,
            LifecycleStatus::Active | LifecycleStatus::EndingSoon | LifecycleStatus::JustCreated
        )
    }
}

/// Classify an offer's lifecycle state at `now`.
///
/// A deactivated offer classifies as expired even inside its date range.
/// The just-created window is checked before ending-soon, so a short-lived
/// offer reads as new first.
pub fn classify(offer: &Offer, now: DateTime<Utc>) -> LifecycleStatus {
    if now < offer.start_date {
        return LifecycleStatus::Scheduled;
    }
    if now > offer.end_date || !offer.is_active {
        return LifecycleStatus::Expired;
    }
    if (now - offer.start_date).num_days() <= JUST_CREATED_WINDOW_DAYS {
        return LifecycleStatus::JustCreated;
    }
    if (offer.end_date - now).num_days() <= ENDING_SOON_WINDOW_DAYS {
        return LifecycleStatus::EndingSoon;
    }
    LifecycleStatus::Active
}

/// Whole days until the offer's end date. Negative once expired.
pub fn days_remaining(offer: &Offer, now: DateTime<Utc>) -> i64 {
    (offer.end_date - now).num_days()
}
