//! Status derivation for subscriptions.
//!
//! Status is never stored. It is a pure function of `(is_active, end_date,
//! today)` recomputed on every read, so badges, filters and counters can
//! never drift apart: they all call the same derivation.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::subscription::model::Subscription;

/// Canonical lookahead window for [`SubscriptionStatus::ExpiringSoon`],
/// in days.
///
/// List views that want a wider warning horizon (the product overview uses
/// 30 days) pass their own threshold to
/// [`SubscriptionStatus::resolve_with_lookahead`]; that is a display
/// concern, not a different status.
pub const EXPIRING_SOON_WINDOW_DAYS: u32 = 7;

/// Derived display status of a subscription.
///
/// Computed at read time; there is no stored state machine and no
/// transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Enabled and not near its end date (or has none).
    Active,
    /// Enabled, ends within the lookahead window.
    ExpiringSoon,
    /// Enabled, end date is in the past.
    Expired,
    /// Disabled by an operator; overrides all date logic.
    Inactive,
}

impl SubscriptionStatus {
    /// Derives the status with the canonical 7-day lookahead window.
    #[must_use]
    pub fn resolve(is_active: bool, end_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self::resolve_with_lookahead(is_active, end_date, today, EXPIRING_SOON_WINDOW_DAYS)
    }

    /// Derives the status with a caller-supplied lookahead window.
    ///
    /// The rules, in order:
    ///
    /// 1. Disabled subscriptions are [`Inactive`](Self::Inactive), whatever
    ///    their dates say.
    /// 2. An end date strictly before `today` is
    ///    [`Expired`](Self::Expired); a subscription ending today is still
    ///    usable today.
    /// 3. An end date within `lookahead_days` of `today` is
    ///    [`ExpiringSoon`](Self::ExpiringSoon).
    /// 4. Everything else, including credit subscriptions with no end date,
    ///    is [`Active`](Self::Active).
    #[must_use]
    pub fn resolve_with_lookahead(
        is_active: bool,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
        lookahead_days: u32,
    ) -> Self {
        if !is_active {
            return Self::Inactive;
        }

        match end_date {
            Some(end) if end < today => Self::Expired,
            Some(end) if end < today + Duration::days(i64::from(lookahead_days)) => {
                Self::ExpiringSoon
            }
            _ => Self::Active,
        }
    }

    /// Derives the status of a subscription record.
    #[must_use]
    pub fn of(subscription: &Subscription, today: NaiveDate) -> Self {
        Self::resolve(subscription.is_active, subscription.end_date, today)
    }

    /// Returns the badge label for list views.
    #[must_use]
    pub fn display(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::ExpiringSoon => "Expiring soon",
            Self::Expired => "Expired",
            Self::Inactive => "Inactive",
        }
    }
}

/// Status filter options offered by the subscription list views.
///
/// `Expired` matches on the end date alone, mirroring the list filter: a
/// disabled subscription whose date has passed shows under both `Inactive`
/// and `Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No filtering.
    #[default]
    All,
    /// Enabled subscriptions only.
    Active,
    /// Disabled subscriptions only.
    Inactive,
    /// Subscriptions whose end date has passed.
    Expired,
}

impl StatusFilter {
    /// Returns true if the subscription passes this filter on `today`.
    #[must_use]
    pub fn matches(self, subscription: &Subscription, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Active => subscription.is_active,
            Self::Inactive => !subscription.is_active,
            Self::Expired => subscription.end_date.is_some_and(|end| end < today),
        }
    }
}
