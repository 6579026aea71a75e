//! Lifecycle engine: orchestrates validation, duration resolution, credit
//! accounting and persistence.
//!
//! The engine is the only layer that touches the store and the clock. It
//! keeps the pure components in [`subscription`](crate::subscription) free
//! of I/O and feeds them the product, the payload and "today".

use tracing::{info, instrument};

use crate::catalog::Product;
use crate::config::EngineConfig;
use crate::context::CurrentUser;
use crate::error::{CoreError, Result};
use crate::store::{Clock, ProductStore, SubscriptionStore};
use crate::subscription::model::{
    NewSubscription, Subscription, SubscriptionId, SubscriptionUpdate,
};
use crate::subscription::stats::SubscriptionStats;
use crate::subscription::status::{StatusFilter, SubscriptionStatus};
use crate::subscription::{credits, duration, validator};

/// Orchestrates subscription lifecycle operations against a store and a
/// clock.
#[derive(Debug)]
pub struct LifecycleEngine<S, C> {
    store: S,
    clock: C,
    config: EngineConfig,
}

impl<S, C> LifecycleEngine<S, C>
where
    S: ProductStore + SubscriptionStore,
    C: Clock,
{
    /// Creates an engine over the given store and clock.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if the configuration is invalid.
    pub fn new(store: S, clock: C, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, clock, config })
    }

    /// Validates and persists a product.
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for a malformed product, or a
    /// store error.
    #[instrument(skip(self, product), fields(product_id = %product.id.as_str()))]
    pub fn save_product(&self, product: &Product) -> Result<()> {
        product.validate()?;
        self.store.save_product(product)?;
        info!("product saved");
        Ok(())
    }

    /// Creates a subscription from a creation payload.
    ///
    /// The end date is derived from the product's duration policy, never
    /// taken from the caller; credit usage starts at zero. The id is
    /// store-assigned.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown product, a field-level
    /// validation error for a bad payload, and `CoreError::Configuration`
    /// if the stored product itself fails validation.
    #[instrument(
        skip(self, draft, user),
        fields(
            member_id = %draft.member_id.as_str(),
            product_id = %draft.product_id.as_str(),
            operator_id = %user.operator_id.as_str(),
        )
    )]
    pub fn create_subscription(
        &self,
        draft: &NewSubscription,
        user: &CurrentUser,
    ) -> Result<Subscription> {
        let product = self.store.load_product(&draft.product_id)?;

        // A stored product that no longer validates cannot anchor new
        // subscriptions; surface that as a configuration problem, not a
        // form error.
        product
            .validate()
            .map_err(|e| CoreError::Configuration(format!("stored product is invalid: {e}")))?;

        validator::validate_new_subscription(draft, &product)?;
        let start_date = draft
            .start_date
            .ok_or_else(|| CoreError::Configuration("start date missing after validation".to_owned()))?;

        let end_date = duration::resolve_end_date(start_date, &product.duration_policy)?;

        let subscription = Subscription {
            id: self.store.next_id()?,
            member_id: draft.member_id.clone(),
            product_id: draft.product_id.clone(),
            start_date,
            end_date,
            credits_used: 0,
            auto_renew: draft.auto_renew,
            is_active: draft.is_active,
            created_by: Some(user.operator_id.clone()),
        };

        self.store.save_subscription(&subscription)?;
        info!(subscription_id = %subscription.id.as_str(), "subscription created");
        Ok(subscription)
    }

    /// Applies an edit payload to a subscription.
    ///
    /// Writes are whole-record and last-writer-wins. For calendar products
    /// the payload's `credits_used` is ignored and the stored value kept;
    /// for credit products the payload's `end_date` must be absent.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown subscription or product,
    /// and a field-level validation error for a bad payload.
    #[instrument(skip(self, update), fields(subscription_id = %id.as_str()))]
    pub fn update_subscription(
        &self,
        id: &SubscriptionId,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription> {
        let mut subscription = self.store.load_subscription(id)?;
        let product = self.store.load_product(&subscription.product_id)?;

        validator::validate_update(update, &product)?;
        let start_date = update
            .start_date
            .ok_or_else(|| CoreError::Configuration("start date missing after validation".to_owned()))?;

        subscription.start_date = start_date;
        subscription.end_date = update.end_date;
        subscription.auto_renew = update.auto_renew;
        subscription.is_active = update.is_active;
        if product.duration_policy.is_credit_based() {
            subscription.credits_used = credits::check_credits_used(&product, update.credits_used)?;
        }

        self.store.save_subscription(&subscription)?;
        info!("subscription updated");
        Ok(subscription)
    }

    /// Records credit consumption on a subscription.
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error on overdraft, and
    /// `CoreError::Configuration` if the product is not credit-based. On
    /// rejection the stored record is untouched.
    #[instrument(skip(self), fields(subscription_id = %id.as_str(), delta))]
    pub fn record_usage(&self, id: &SubscriptionId, delta: i64) -> Result<Subscription> {
        let subscription = self.store.load_subscription(id)?;
        let product = self.store.load_product(&subscription.product_id)?;

        let updated = credits::record_usage(&product, &subscription, delta)?;
        self.store.save_subscription(&updated)?;
        info!(credits_used = updated.credits_used, "credit usage recorded");
        Ok(updated)
    }

    /// Returns the credits remaining on a credit-based subscription.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown subscription, and
    /// `CoreError::Configuration` if the product is not credit-based.
    pub fn remaining_credits(&self, id: &SubscriptionId) -> Result<u32> {
        let subscription = self.store.load_subscription(id)?;
        let product = self.store.load_product(&subscription.product_id)?;
        credits::remaining(&product, &subscription)
    }

    /// Derives the current status of a subscription using the configured
    /// expiring-soon window.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown subscription.
    pub fn status_of(&self, id: &SubscriptionId) -> Result<SubscriptionStatus> {
        let subscription = self.store.load_subscription(id)?;
        Ok(SubscriptionStatus::resolve_with_lookahead(
            subscription.is_active,
            subscription.end_date,
            self.clock.today(),
            self.config.expiring_soon_window_days,
        ))
    }

    /// Lists subscriptions passing the given status filter.
    ///
    /// # Errors
    ///
    /// Returns a store error if the list cannot be read.
    pub fn list_subscriptions(&self, filter: StatusFilter) -> Result<Vec<Subscription>> {
        let today = self.clock.today();
        let mut subscriptions = self.store.list_subscriptions()?;
        subscriptions.retain(|s| filter.matches(s, today));
        Ok(subscriptions)
    }

    /// Computes the overview counters using the configured stats lookahead.
    ///
    /// Subscriptions whose product has been deleted are skipped rather than
    /// failing the whole overview.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lists cannot be read.
    pub fn list_stats(&self) -> Result<SubscriptionStats> {
        let subscriptions = self.store.list_subscriptions()?;
        let products = self.store.list_products()?;

        let pairs = subscriptions.iter().filter_map(|s| {
            products.iter().find(|p| p.id == s.product_id).map(|p| (s, p))
        });

        Ok(SubscriptionStats::compute(
            pairs,
            self.clock.today(),
            self.config.stats_lookahead_days,
        ))
    }

    /// Removes a subscription.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown subscription.
    #[instrument(skip(self), fields(subscription_id = %id.as_str()))]
    pub fn delete_subscription(&self, id: &SubscriptionId) -> Result<()> {
        self.store.delete_subscription(id)?;
        info!("subscription deleted");
        Ok(())
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::{DurationPolicy, DurationUnit, ProductId};
    use crate::store::{FixedClock, MemoryStore};
    use crate::subscription::model::{MemberId, OperatorId};

    fn engine() -> LifecycleEngine<MemoryStore, FixedClock> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        LifecycleEngine::new(MemoryStore::new(), clock, EngineConfig::default()).unwrap()
    }

    fn monthly_product() -> Product {
        Product {
            id: ProductId::new("prod-monthly").unwrap(),
            name: "Monthly Pass".to_owned(),
            description: None,
            price: Decimal::new(4990, 2),
            duration_policy: DurationPolicy::Calendar { unit: DurationUnit::Months, value: 1 },
            is_active: true,
        }
    }

    fn credit_product() -> Product {
        Product {
            id: ProductId::new("prod-credits").unwrap(),
            name: "10 Entry Card".to_owned(),
            description: None,
            price: Decimal::new(8000, 2),
            duration_policy: DurationPolicy::Credits { credits_included: 10 },
            is_active: true,
        }
    }

    fn operator() -> CurrentUser {
        CurrentUser::new(OperatorId::new("op-1").unwrap())
    }

    fn draft(product_id: &str) -> NewSubscription {
        let mut draft = NewSubscription::new(
            MemberId::new("member-1").unwrap(),
            ProductId::new(product_id).unwrap(),
        );
        draft.start_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        draft
    }

    // ========================================================================
    // Creation Tests
    // ========================================================================

    #[test]
    fn test_create_calendar_subscription_derives_end_date() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();

        let subscription = engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();

        assert_eq!(subscription.end_date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(subscription.credits_used, 0);
        assert_eq!(subscription.created_by, Some(OperatorId::new("op-1").unwrap()));
    }

    #[test]
    fn test_create_credit_subscription_has_no_end_date() {
        let engine = engine();
        engine.save_product(&credit_product()).unwrap();

        let subscription = engine.create_subscription(&draft("prod-credits"), &operator()).unwrap();

        assert_eq!(subscription.end_date, None);
    }

    #[test]
    fn test_create_with_unknown_product_is_not_found() {
        let engine = engine();
        let err = engine.create_subscription(&draft("prod-missing"), &operator()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "product", .. }));
    }

    #[test]
    fn test_create_without_start_date_is_rejected() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();

        let mut draft = draft("prod-monthly");
        draft.start_date = None;

        let err = engine.create_subscription(&draft, &operator()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_invalid_product_rejected_on_save() {
        let engine = engine();
        let mut product = monthly_product();
        product.name = String::new();

        assert!(matches!(engine.save_product(&product).unwrap_err(), CoreError::Validation(_)));
    }

    // ========================================================================
    // Update Tests
    // ========================================================================

    #[test]
    fn test_update_overwrites_whole_record() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();

        let mut update = SubscriptionUpdate::from_subscription(&created);
        update.end_date = NaiveDate::from_ymd_opt(2024, 8, 1);
        update.is_active = false;

        let updated = engine.update_subscription(&created.id, &update).unwrap();
        assert_eq!(updated.end_date, NaiveDate::from_ymd_opt(2024, 8, 1));
        assert!(!updated.is_active);

        let reloaded = engine.store.load_subscription(&created.id).unwrap();
        assert!(!reloaded.is_active);
    }

    #[test]
    fn test_update_calendar_ignores_credits_field() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();

        let mut update = SubscriptionUpdate::from_subscription(&created);
        update.credits_used = 42;

        let updated = engine.update_subscription(&created.id, &update).unwrap();
        assert_eq!(updated.credits_used, 0);
    }

    #[test]
    fn test_update_credit_sets_absolute_usage() {
        let engine = engine();
        engine.save_product(&credit_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-credits"), &operator()).unwrap();

        let mut update = SubscriptionUpdate::from_subscription(&created);
        update.credits_used = 6;

        let updated = engine.update_subscription(&created.id, &update).unwrap();
        assert_eq!(updated.credits_used, 6);
    }

    #[test]
    fn test_update_rejection_leaves_record_unchanged() {
        let engine = engine();
        engine.save_product(&credit_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-credits"), &operator()).unwrap();

        let mut update = SubscriptionUpdate::from_subscription(&created);
        update.credits_used = 99;

        assert!(engine.update_subscription(&created.id, &update).is_err());
        let reloaded = engine.store.load_subscription(&created.id).unwrap();
        assert_eq!(reloaded.credits_used, 0);
    }

    // ========================================================================
    // Credit Flow Tests
    // ========================================================================

    #[test]
    fn test_record_usage_persists() {
        let engine = engine();
        engine.save_product(&credit_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-credits"), &operator()).unwrap();

        engine.record_usage(&created.id, 3).unwrap();
        assert_eq!(engine.remaining_credits(&created.id).unwrap(), 7);
    }

    #[test]
    fn test_overdraft_does_not_persist() {
        let engine = engine();
        engine.save_product(&credit_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-credits"), &operator()).unwrap();
        engine.record_usage(&created.id, 3).unwrap();

        assert!(engine.record_usage(&created.id, 8).is_err());
        assert_eq!(engine.remaining_credits(&created.id).unwrap(), 7);
    }

    // ========================================================================
    // Status and Stats Tests
    // ========================================================================

    #[test]
    fn test_status_uses_configured_window() {
        // Clock pinned to 2024-06-15; subscription ends 2024-07-01.
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        let store = MemoryStore::new();
        let config = EngineConfig { expiring_soon_window_days: 30, ..EngineConfig::default() };
        let engine = LifecycleEngine::new(store, clock, config).unwrap();

        engine.save_product(&monthly_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();

        assert_eq!(engine.status_of(&created.id).unwrap(), SubscriptionStatus::ExpiringSoon);
    }

    #[test]
    fn test_list_stats() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();
        engine.save_product(&credit_product()).unwrap();
        engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();
        engine.create_subscription(&draft("prod-credits"), &operator()).unwrap();

        let stats = engine.list_stats().unwrap();
        assert_eq!(stats.active, 2);
        assert_eq!(stats.active_revenue, Decimal::new(12990, 2));
        // Monthly subscription ends 2024-07-01, within the 30-day lookahead.
        assert_eq!(stats.expiring_soon, 1);
    }

    #[test]
    fn test_list_subscriptions_filtered() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();

        let mut update = SubscriptionUpdate::from_subscription(&created);
        update.is_active = false;
        engine.update_subscription(&created.id, &update).unwrap();

        assert_eq!(engine.list_subscriptions(StatusFilter::All).unwrap().len(), 1);
        assert!(engine.list_subscriptions(StatusFilter::Active).unwrap().is_empty());
        assert_eq!(engine.list_subscriptions(StatusFilter::Inactive).unwrap().len(), 1);
    }

    // ========================================================================
    // Deletion Tests
    // ========================================================================

    #[test]
    fn test_delete_subscription() {
        let engine = engine();
        engine.save_product(&monthly_product()).unwrap();
        let created = engine.create_subscription(&draft("prod-monthly"), &operator()).unwrap();

        engine.delete_subscription(&created.id).unwrap();
        assert!(matches!(
            engine.delete_subscription(&created.id).unwrap_err(),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        let config = EngineConfig { expiring_soon_window_days: 0, ..EngineConfig::default() };
        assert!(LifecycleEngine::new(MemoryStore::new(), clock, config).is_err());
    }
}
