//! Persistence and clock boundaries.
//!
//! The lifecycle engine talks to storage and to "now" only through the
//! traits in this module, so the domain logic stays deterministic under
//! test. [`MemoryStore`] and [`FixedClock`] are the test doubles;
//! production wiring supplies a database-backed store and [`SystemClock`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::{Product, ProductId};
use crate::error::{CoreError, Result};
use crate::subscription::model::{Subscription, SubscriptionId};

/// Source of the current time.
///
/// All date-sensitive logic receives time through this trait; nothing in
/// the crate calls `Utc::now` directly outside [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Read and write access to the product catalog.
pub trait ProductStore: Send + Sync {
    /// Loads a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no product has that id.
    fn load_product(&self, id: &ProductId) -> Result<Product>;

    /// Persists a product, inserting or replacing by id.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store rejects the write.
    fn save_product(&self, product: &Product) -> Result<()>;

    /// Lists all products.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn list_products(&self) -> Result<Vec<Product>>;
}

/// Read and write access to subscription records.
pub trait SubscriptionStore: Send + Sync {
    /// Loads a subscription by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no subscription has that id.
    fn load_subscription(&self, id: &SubscriptionId) -> Result<Subscription>;

    /// Persists a subscription, inserting or replacing by id. Writes are
    /// whole-record and last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store rejects the write.
    fn save_subscription(&self, subscription: &Subscription) -> Result<()>;

    /// Removes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no subscription has that id.
    fn delete_subscription(&self, id: &SubscriptionId) -> Result<()>;

    /// Lists all subscriptions.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn list_subscriptions(&self) -> Result<Vec<Subscription>>;

    /// Allocates a fresh subscription id. Ids are store-assigned, the way a
    /// database would generate them.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot allocate an id.
    fn next_id(&self) -> Result<SubscriptionId>;
}

impl<T: ProductStore + ?Sized> ProductStore for std::sync::Arc<T> {
    fn load_product(&self, id: &ProductId) -> Result<Product> {
        (**self).load_product(id)
    }

    fn save_product(&self, product: &Product) -> Result<()> {
        (**self).save_product(product)
    }

    fn list_products(&self) -> Result<Vec<Product>> {
        (**self).list_products()
    }
}

impl<T: SubscriptionStore + ?Sized> SubscriptionStore for std::sync::Arc<T> {
    fn load_subscription(&self, id: &SubscriptionId) -> Result<Subscription> {
        (**self).load_subscription(id)
    }

    fn save_subscription(&self, subscription: &Subscription) -> Result<()> {
        (**self).save_subscription(subscription)
    }

    fn delete_subscription(&self, id: &SubscriptionId) -> Result<()> {
        (**self).delete_subscription(id)
    }

    fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        (**self).list_subscriptions()
    }

    fn next_id(&self) -> Result<SubscriptionId> {
        (**self).next_id()
    }
}

/// In-memory store implementing both store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Mutex<HashMap<ProductId, Product>>,
    subscriptions: Mutex<HashMap<SubscriptionId, Subscription>>,
    id_counter: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn products(&self) -> Result<std::sync::MutexGuard<'_, HashMap<ProductId, Product>>> {
        self.products
            .lock()
            .map_err(|_| CoreError::Configuration("product store lock poisoned".to_owned()))
    }

    fn subscriptions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SubscriptionId, Subscription>>> {
        self.subscriptions
            .lock()
            .map_err(|_| CoreError::Configuration("subscription store lock poisoned".to_owned()))
    }
}

impl ProductStore for MemoryStore {
    fn load_product(&self, id: &ProductId) -> Result<Product> {
        self.products()?
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("product", id.as_str()))
    }

    fn save_product(&self, product: &Product) -> Result<()> {
        self.products()?.insert(product.id.clone(), product.clone());
        Ok(())
    }

    fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products()?.values().cloned().collect())
    }
}

impl SubscriptionStore for MemoryStore {
    fn load_subscription(&self, id: &SubscriptionId) -> Result<Subscription> {
        self.subscriptions()?
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("subscription", id.as_str()))
    }

    fn save_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.subscriptions()?.insert(subscription.id.clone(), subscription.clone());
        Ok(())
    }

    fn delete_subscription(&self, id: &SubscriptionId) -> Result<()> {
        self.subscriptions()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("subscription", id.as_str()))
    }

    fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        Ok(self.subscriptions()?.values().cloned().collect())
    }

    fn next_id(&self) -> Result<SubscriptionId> {
        let n = self.id_counter.fetch_add(1, Ordering::Relaxed) + 1;
        SubscriptionId::new(format!("sub-{n:08}"))
    }
}
