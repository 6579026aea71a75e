//! Credit accounting for credit-based subscriptions.
//!
//! Tracks consumption against the product's allotment. Bad values are
//! rejected with field-level messages, never clamped: an overdraft attempt
//! leaves `credits_used` untouched and reports which field failed.
//!
//! These functions are only meaningful for credit-based products. Calling
//! them with a calendar product is a caller bug and reported as a
//! configuration error rather than silently coercing `credits_used`.

use crate::catalog::Product;
use crate::error::{CoreError, Result, ValidationError};
use crate::subscription::model::Subscription;

/// Message used whenever a mutation would push `credits_used` past the
/// product's allotment.
pub const CREDITS_EXCEEDED: &str = "credits used cannot exceed credits included";

/// Message used whenever a mutation would make `credits_used` negative.
pub const CREDITS_NEGATIVE: &str = "credits used cannot be negative";

fn allotment(product: &Product) -> Result<u32> {
    product.duration_policy.credits_included().ok_or_else(|| {
        CoreError::Configuration(format!(
            "product {} is not credit-based; credit accounting does not apply",
            product.id.as_str()
        ))
    })
}

/// Returns the credits remaining on a credit-based subscription.
///
/// Never reports a negative number: if a stored record somehow carries
/// `credits_used` above the allotment, remaining saturates at zero. Writes
/// that would create such a record are rejected by [`check_credits_used`].
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] if the product is not credit-based.
pub fn remaining(product: &Product, subscription: &Subscription) -> Result<u32> {
    let included = allotment(product)?;
    Ok(included.saturating_sub(subscription.credits_used))
}

/// Validates an absolute `credits_used` value against the product's
/// allotment, returning the value as an unsigned count on success.
///
/// # Errors
///
/// Returns a field-level [`ValidationError`] on `credits_used` if the value
/// is negative or exceeds the allotment, and
/// [`CoreError::Configuration`] if the product is not credit-based.
pub fn check_credits_used(product: &Product, credits_used: i64) -> Result<u32> {
    let included = allotment(product)?;

    if credits_used < 0 {
        return Err(ValidationError::single("credits_used", CREDITS_NEGATIVE).into());
    }
    if credits_used > i64::from(included) {
        return Err(ValidationError::single("credits_used", CREDITS_EXCEEDED).into());
    }

    // Bounds above guarantee the cast fits.
    Ok(credits_used as u32)
}

/// Records credit consumption, returning the updated subscription.
///
/// `delta` may be zero (a no-op edit) or negative (an operator correction).
/// The input subscription is untouched; on rejection the caller still holds
/// the unchanged record.
///
/// # Errors
///
/// Returns a field-level [`ValidationError`] if the result would exceed the
/// allotment or go below zero, and [`CoreError::Configuration`] if the
/// product is not credit-based.
pub fn record_usage(
    product: &Product,
    subscription: &Subscription,
    delta: i64,
) -> Result<Subscription> {
    let new_used = i64::from(subscription.credits_used) + delta;
    let new_used = check_credits_used(product, new_used)?;

    let mut updated = subscription.clone();
    updated.credits_used = new_used;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::{DurationPolicy, DurationUnit, Product, ProductId};
    use crate::subscription::model::{MemberId, SubscriptionId};

    fn credit_product(credits: u32) -> Product {
        Product {
            id: ProductId::new("prod-credits").unwrap(),
            name: "10 Entry Card".to_owned(),
            description: None,
            price: Decimal::new(8000, 2),
            duration_policy: DurationPolicy::Credits { credits_included: credits },
            is_active: true,
        }
    }

    fn calendar_product() -> Product {
        Product {
            id: ProductId::new("prod-monthly").unwrap(),
            name: "Monthly Pass".to_owned(),
            description: None,
            price: Decimal::new(4990, 2),
            duration_policy: DurationPolicy::Calendar { unit: DurationUnit::Months, value: 1 },
            is_active: true,
        }
    }

    fn subscription(credits_used: u32) -> Subscription {
        Subscription {
            id: SubscriptionId::new("sub-1").unwrap(),
            member_id: MemberId::new("member-1").unwrap(),
            product_id: ProductId::new("prod-credits").unwrap(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            credits_used,
            auto_renew: false,
            is_active: true,
            created_by: None,
        }
    }

    // ========================================================================
    // Remaining Tests
    // ========================================================================

    #[test]
    fn test_remaining() {
        let remaining = remaining(&credit_product(10), &subscription(3)).unwrap();
        assert_eq!(remaining, 7);
    }

    #[test]
    fn test_remaining_never_negative() {
        // Corrupted record: used above allotment. Reported as zero remaining.
        let remaining = remaining(&credit_product(10), &subscription(12)).unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_remaining_on_calendar_product_is_configuration_error() {
        let result = remaining(&calendar_product(), &subscription(0));
        assert!(matches!(result.unwrap_err(), CoreError::Configuration(_)));
    }

    // ========================================================================
    // Record Usage Tests
    // ========================================================================

    #[test]
    fn test_record_usage() {
        let updated = record_usage(&credit_product(10), &subscription(3), 2).unwrap();
        assert_eq!(updated.credits_used, 5);
    }

    #[test]
    fn test_record_usage_zero_delta_is_noop() {
        let updated = record_usage(&credit_product(10), &subscription(3), 0).unwrap();
        assert_eq!(updated.credits_used, 3);
    }

    #[test]
    fn test_record_usage_to_exact_allotment() {
        let updated = record_usage(&credit_product(10), &subscription(3), 7).unwrap();
        assert_eq!(updated.credits_used, 10);
        assert_eq!(remaining(&credit_product(10), &updated).unwrap(), 0);
    }

    #[test]
    fn test_overdraft_rejected_and_input_unchanged() {
        let original = subscription(3);
        let result = record_usage(&credit_product(10), &original, 8);

        let CoreError::Validation(v) = result.unwrap_err() else {
            panic!("expected validation error")
        };
        assert_eq!(v.message_for("credits_used"), Some(CREDITS_EXCEEDED));
        assert_eq!(original.credits_used, 3);
    }

    #[test]
    fn test_negative_result_rejected() {
        let result = record_usage(&credit_product(10), &subscription(3), -4);

        let CoreError::Validation(v) = result.unwrap_err() else {
            panic!("expected validation error")
        };
        assert_eq!(v.message_for("credits_used"), Some(CREDITS_NEGATIVE));
    }

    #[test]
    fn test_negative_delta_correction_allowed() {
        let updated = record_usage(&credit_product(10), &subscription(3), -2).unwrap();
        assert_eq!(updated.credits_used, 1);
    }

    // ========================================================================
    // Absolute Value Tests
    // ========================================================================

    #[test]
    fn test_check_credits_used_in_range() {
        assert_eq!(check_credits_used(&credit_product(10), 10).unwrap(), 10);
        assert_eq!(check_credits_used(&credit_product(10), 0).unwrap(), 0);
    }

    #[test]
    fn test_check_credits_used_above_allotment_rejected() {
        let result = check_credits_used(&credit_product(10), 11);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_credits_used_negative_rejected() {
        let result = check_credits_used(&credit_product(10), -1);
        assert!(result.is_err());
    }
}
