//! Gym Admin Core: Subscription Lifecycle and Credit Accounting
//!
//! A Rust library implementing the domain core of a gym administration
//! console: products with calendar or credit-based duration policies,
//! member subscriptions, end-date resolution, credit accounting and
//! read-time status derivation.
//!
//! # What does it do?
//!
//! Back-office staff assign products (monthly passes, annual memberships,
//! entry cards) to members. This crate owns the rules behind those screens:
//!
//! - **Duration Resolution**: calendar-aware end-date computation with
//!   day-of-month clamping (Jan 31 plus one month lands on the last day of
//!   February)
//! - **Credit Accounting**: consumption tracked against a product's
//!   allotment, overdraft rejected with field-level errors rather than
//!   clamped
//! - **Status Derivation**: active / expiring-soon / expired / inactive
//!   computed from dates and flags on every read, never stored
//! - **Validation**: create and edit payloads checked field by field, all
//!   failures reported together
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use rust_decimal::Decimal;
//! use gym_admin_core::{
//!     catalog::{DurationPolicy, DurationUnit, Product, ProductId},
//!     config::EngineConfig,
//!     context::CurrentUser,
//!     engine::LifecycleEngine,
//!     store::{FixedClock, MemoryStore},
//!     subscription::{MemberId, NewSubscription, OperatorId},
//! };
//!
//! # fn example() -> gym_admin_core::error::Result<()> {
//! let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
//! let engine = LifecycleEngine::new(MemoryStore::new(), clock, EngineConfig::default())?;
//!
//! let product = Product {
//!     id: ProductId::new("monthly-pass")?,
//!     name: "Monthly Pass".to_owned(),
//!     description: None,
//!     price: Decimal::new(4990, 2),
//!     duration_policy: DurationPolicy::Calendar { unit: DurationUnit::Months, value: 1 },
//!     is_active: true,
//! };
//! engine.save_product(&product)?;
//!
//! let mut draft = NewSubscription::new(MemberId::new("member-1")?, product.id.clone());
//! draft.start_date = NaiveDate::from_ymd_opt(2024, 6, 15);
//!
//! let operator = CurrentUser::new(OperatorId::new("op-1")?);
//! let subscription = engine.create_subscription(&draft, &operator)?;
//!
//! assert_eq!(subscription.end_date, NaiveDate::from_ymd_opt(2024, 7, 15));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`catalog`]: products and their duration policies
//! - [`subscription`]: subscription models, duration resolution, credit
//!   accounting, status derivation and validation
//! - [`engine`]: lifecycle orchestration over a store and a clock
//! - [`store`]: persistence and clock traits plus in-memory implementations
//! - [`config`]: engine configuration
//! - [`context`]: operator context for write operations
//! - [`error`]: error types with field-level validation detail
//!
//! # Design Notes
//!
//! Status is never persisted; it is derived from `(is_active, end_date,
//! today)` at read time, so there are no stale status columns to reconcile.
//! The clock is injected through [`store::Clock`], which keeps every
//! date-sensitive rule deterministic under test. Bad credit values are
//! rejected with field-level messages, never silently clamped.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod store;
pub mod subscription;

pub use catalog::{DurationPolicy, DurationUnit, Product, ProductId};
pub use config::EngineConfig;
pub use engine::LifecycleEngine;
pub use error::{CoreError, FieldError, Result, ValidationError};
pub use subscription::{
    MemberId, NewSubscription, Subscription, SubscriptionId, SubscriptionStatus,
};
