//! Subscription product definitions.
//!
//! A product couples a price with a duration policy. The policy is a tagged
//! union so the two shapes (calendar duration vs. credit allotment) are
//! mutually exclusive by construction instead of being inferred from which
//! optional columns happen to be populated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result, ValidationError};

/// Unique identifier for a subscription product.
///
/// Wraps the store-provided id with type safety.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID after validation.
    ///
    /// # Errors
    ///
    /// Returns error if ID is empty, exceeds 64 characters, or contains invalid characters.
    /// Only alphanumeric characters, hyphens, and underscores are allowed.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        validate_id(&id, "product_id")?;
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn validate_id(id: &str, field: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ValidationError::single(field, format!("{field} cannot be empty")).into());
    }
    if id.len() > 64 {
        return Err(
            ValidationError::single(field, format!("{field} must be 64 characters or less")).into()
        );
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::single(
            field,
            format!("{field} can only contain alphanumeric characters, hyphens, and underscores"),
        )
        .into());
    }
    Ok(())
}

/// Calendar unit for duration policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    /// Calendar days.
    Days,
    /// Calendar weeks (7 days).
    Weeks,
    /// Calendar months, clamped to the last valid day of the target month.
    Months,
    /// Calendar years, clamped for Feb 29 starts in non-leap years.
    Years,
}

impl DurationUnit {
    /// Returns the unit name, singular or plural depending on `value`.
    #[must_use]
    pub fn display(self, value: u32) -> &'static str {
        match (self, value) {
            (Self::Days, 1) => "day",
            (Self::Days, _) => "days",
            (Self::Weeks, 1) => "week",
            (Self::Weeks, _) => "weeks",
            (Self::Months, 1) => "month",
            (Self::Months, _) => "months",
            (Self::Years, 1) => "year",
            (Self::Years, _) => "years",
        }
    }
}

/// Duration policy for a subscription product.
///
/// Exactly one shape applies to a product:
///
/// - [`Calendar`](Self::Calendar): the subscription expires `value` units
///   after its start date.
/// - [`Credits`](Self::Credits): the subscription carries a fixed usage
///   allotment and never expires by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Calendar-duration policy: `value` units of `unit` from the start date.
    Calendar {
        /// Calendar unit.
        unit: DurationUnit,
        /// Number of units; must be positive.
        value: u32,
    },
    /// Consumption policy: a fixed credit pool, no calendar expiry.
    Credits {
        /// Credits granted at subscription start; must be positive.
        credits_included: u32,
    },
}

impl DurationPolicy {
    /// Returns true for credit-based policies.
    #[must_use]
    pub fn is_credit_based(&self) -> bool {
        matches!(self, Self::Credits { .. })
    }

    /// Returns the credit allotment for credit-based policies.
    #[must_use]
    pub fn credits_included(&self) -> Option<u32> {
        match self {
            Self::Credits { credits_included } => Some(*credits_included),
            Self::Calendar { .. } => None,
        }
    }

    /// Returns a human-readable duration label for list views.
    ///
    /// Examples: `"3 months"`, `"1 year"`, `"10 credits"`.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self {
            Self::Calendar { unit, value } => format!("{value} {}", unit.display(*value)),
            Self::Credits { credits_included } => format!("{credits_included} credits"),
        }
    }
}

/// A purchasable subscription definition.
///
/// Reference data created and edited by an operator. Subscriptions point at
/// a product by id and read its duration policy at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Price per subscription; non-negative.
    pub price: Decimal,
    /// Duration policy.
    pub duration_policy: DurationPolicy,
    /// Whether the product is currently sellable.
    pub is_active: bool,
}

impl Product {
    /// Validates the product definition before it is stored.
    ///
    /// Checks, in order: name present, price non-negative, calendar value
    /// positive, credit allotment positive. All failed fields are reported
    /// together.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every failed field.
    pub fn validate(&self) -> Result<()> {
        let mut fields = Vec::new();

        if self.name.trim().is_empty() {
            fields.push(FieldError {
                field: "name".to_owned(),
                message: "product name is required".to_owned(),
            });
        }

        if self.price.is_sign_negative() {
            fields.push(FieldError {
                field: "price".to_owned(),
                message: "price cannot be negative".to_owned(),
            });
        }

        match self.duration_policy {
            DurationPolicy::Calendar { value, .. } if value == 0 => {
                fields.push(FieldError {
                    field: "duration_value".to_owned(),
                    message: "duration must be greater than 0".to_owned(),
                });
            }
            DurationPolicy::Credits { credits_included } if credits_included == 0 => {
                fields.push(FieldError {
                    field: "credits_included".to_owned(),
                    message: "credits included must be greater than 0 for credit subscriptions"
                        .to_owned(),
                });
            }
            _ => {}
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields }.into())
        }
    }
}
