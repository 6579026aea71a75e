//! Subscription data models.
//!
//! A [`Subscription`] is a member's instantiation of a product, with its own
//! dates and credit usage. It references its member and product by id; it
//! owns neither.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::product::validate_id;
use crate::catalog::ProductId;
use crate::error::Result;

/// Unique identifier for a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Creates a new subscription ID after validation.
    ///
    /// # Errors
    ///
    /// Returns error if ID is empty, exceeds 64 characters, or contains
    /// characters other than alphanumerics, hyphens, and underscores.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        validate_id(&id, "subscription_id")?;
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a gym member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a new member ID after validation.
    ///
    /// # Errors
    ///
    /// Returns error if ID is empty, exceeds 64 characters, or contains
    /// characters other than alphanumerics, hyphens, and underscores.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        validate_id(&id, "member_id")?;
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a back-office operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorId(String);

impl OperatorId {
    /// Creates a new operator ID after validation.
    ///
    /// # Errors
    ///
    /// Returns error if ID is empty, exceeds 64 characters, or contains
    /// characters other than alphanumerics, hyphens, and underscores.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        validate_id(&id, "operator_id")?;
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A member's subscription to a product.
///
/// Invariants maintained by the validator and the lifecycle engine:
///
/// - `end_date` is present iff the referenced product has a calendar policy,
///   and is strictly after `start_date`.
/// - `credits_used` never exceeds the product's allotment for credit
///   products; for calendar products it stays `0` and is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: SubscriptionId,
    /// Member this subscription belongs to.
    pub member_id: MemberId,
    /// Product this subscription instantiates.
    pub product_id: ProductId,
    /// First day of validity.
    pub start_date: NaiveDate,
    /// Last day of validity; absent for credit-based products.
    pub end_date: Option<NaiveDate>,
    /// Credits consumed so far; meaningful only for credit-based products.
    pub credits_used: u32,
    /// Whether the subscription renews automatically. Descriptive only; no
    /// renewal job acts on it.
    pub auto_renew: bool,
    /// Operator-controlled enabled flag, independent of date-derived expiry.
    pub is_active: bool,
    /// Operator who created the subscription, when known.
    pub created_by: Option<OperatorId>,
}

/// Payload for creating a subscription, as assembled by the creation form.
///
/// `start_date` is optional here because the form may submit without one;
/// the validator rejects that case with a field-level message rather than
/// making it unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubscription {
    /// Member to subscribe.
    pub member_id: MemberId,
    /// Product being assigned.
    pub product_id: ProductId,
    /// Requested first day of validity. May be future-dated.
    pub start_date: Option<NaiveDate>,
    /// Auto-renew flag; defaults to off.
    pub auto_renew: bool,
    /// Enabled flag; defaults to on.
    pub is_active: bool,
}

impl NewSubscription {
    /// Creates a draft with the creation form's defaults: active, no
    /// auto-renew, start date to be filled in.
    #[must_use]
    pub fn new(member_id: MemberId, product_id: ProductId) -> Self {
        Self { member_id, product_id, start_date: None, auto_renew: false, is_active: true }
    }
}

/// Payload for editing an existing subscription.
///
/// Mirrors the edit form: dates, absolute credits-used value, and the two
/// flags. `credits_used` is a signed raw input so that negative form values
/// reach the validator and get a field message instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    /// New first day of validity. Required; `None` is rejected.
    pub start_date: Option<NaiveDate>,
    /// New last day of validity, for calendar products.
    pub end_date: Option<NaiveDate>,
    /// New absolute credits-used value, for credit products.
    pub credits_used: i64,
    /// New auto-renew flag.
    pub auto_renew: bool,
    /// New enabled flag.
    pub is_active: bool,
}

impl SubscriptionUpdate {
    /// Builds an update pre-filled from the current subscription state, the
    /// way the edit form opens.
    #[must_use]
    pub fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            start_date: Some(subscription.start_date),
            end_date: subscription.end_date,
            credits_used: i64::from(subscription.credits_used),
            auto_renew: subscription.auto_renew,
            is_active: subscription.is_active,
        }
    }
}
