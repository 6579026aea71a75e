//! Validation of subscription create and edit payloads.
//!
//! Both entry points accumulate every failure into one
//! [`ValidationError`] so a form can mark all offending fields in a single
//! round trip. Rules that depend on the product's duration policy (end date
//! presence, credit bounds) are checked here against the resolved product.

use crate::catalog::Product;
use crate::error::{FieldError, Result, ValidationError};
use crate::subscription::credits;
use crate::subscription::model::{NewSubscription, SubscriptionUpdate};

/// Validates a creation payload against its product.
///
/// Checks that a start date was supplied and that the product itself is
/// well-formed. End date and credit fields are not part of the creation
/// form; the engine derives them from the product.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every offending field.
pub fn validate_new_subscription(draft: &NewSubscription, product: &Product) -> Result<()> {
    let mut fields = Vec::new();

    if draft.start_date.is_none() {
        fields.push(FieldError {
            field: "start_date".to_owned(),
            message: "start date is required".to_owned(),
        });
    }

    if !product.is_active {
        fields.push(FieldError {
            field: "product_id".to_owned(),
            message: "product is not available for new subscriptions".to_owned(),
        });
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields }.into())
    }
}

/// Validates an edit payload against the subscription's product.
///
/// The edit form exposes both dates, the absolute credits-used value and
/// the two flags. Which of those apply depends on the product:
///
/// - Calendar products require an end date strictly after the start date;
///   `credits_used` is ignored.
/// - Credit products must not carry an end date; `credits_used` must sit
///   within `0..=credits_included`.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every offending field.
pub fn validate_update(update: &SubscriptionUpdate, product: &Product) -> Result<()> {
    let mut fields = Vec::new();

    if update.start_date.is_none() {
        fields.push(FieldError {
            field: "start_date".to_owned(),
            message: "start date is required".to_owned(),
        });
    }

    if product.duration_policy.is_credit_based() {
        if update.end_date.is_some() {
            fields.push(FieldError {
                field: "end_date".to_owned(),
                message: "credit subscriptions do not have an end date".to_owned(),
            });
        }
        if let Err(crate::error::CoreError::Validation(v)) =
            credits::check_credits_used(product, update.credits_used)
        {
            fields.extend(v.fields);
        }
    } else {
        match update.end_date {
            None => fields.push(FieldError {
                field: "end_date".to_owned(),
                message: "end date is required".to_owned(),
            }),
            Some(end) => {
                if let Some(start) = update.start_date {
                    if end <= start {
                        fields.push(FieldError {
                            field: "end_date".to_owned(),
                            message: "end date must be after start date".to_owned(),
                        });
                    }
                }
            }
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields }.into())
    }
}
