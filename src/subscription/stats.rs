//! Aggregate counters for subscription list views.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::subscription::model::Subscription;
use crate::subscription::status::SubscriptionStatus;

/// Summary counters shown above the subscription list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionStats {
    /// Number of enabled subscriptions.
    pub active: u64,
    /// Sum of product prices over enabled subscriptions.
    pub active_revenue: Decimal,
    /// Number of enabled subscriptions ending within the lookahead window.
    pub expiring_soon: u64,
}

impl SubscriptionStats {
    /// Computes the counters over `(subscription, product)` pairs as of
    /// `today`, counting expiry within `lookahead_days`.
    ///
    /// The revenue figure is the naive sum of list prices of enabled
    /// subscriptions, matching what the overview header shows; it is not a
    /// billing amount.
    #[must_use]
    pub fn compute<'a, I>(pairs: I, today: NaiveDate, lookahead_days: u32) -> Self
    where
        I: IntoIterator<Item = (&'a Subscription, &'a Product)>,
    {
        let mut stats = Self::default();

        for (subscription, product) in pairs {
            if !subscription.is_active {
                continue;
            }
            stats.active += 1;
            stats.active_revenue += product.price;

            let status = SubscriptionStatus::resolve_with_lookahead(
                subscription.is_active,
                subscription.end_date,
                today,
                lookahead_days,
            );
            if status == SubscriptionStatus::ExpiringSoon {
                stats.expiring_soon += 1;
            }
        }

        stats
    }
}
