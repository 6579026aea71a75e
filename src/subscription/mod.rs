//! Subscription lifecycle: models, duration resolution, credit accounting,
//! status derivation and validation.
//!
//! The lifecycle logic is split into small pure components:
//!
//! - [`duration`]: computes a subscription's end date from its product's
//!   duration policy.
//! - [`credits`]: tracks credit consumption against a product's allotment.
//! - [`status`]: derives the display status (active / expiring soon /
//!   expired / inactive) from dates and flags at read time.
//! - [`validator`]: gates create/edit payloads before they reach the store.
//! - [`stats`]: aggregates for list views.
//!
//! None of these components touch the system clock or the store; "now" and
//! persistence are injected at the [`engine`](crate::engine) layer.

pub mod credits;
pub mod duration;
pub mod model;
pub mod stats;
pub mod status;
pub mod validator;

pub use model::{MemberId, NewSubscription, OperatorId, Subscription, SubscriptionId, SubscriptionUpdate};
pub use stats::SubscriptionStats;
pub use status::{StatusFilter, SubscriptionStatus, EXPIRING_SOON_WINDOW_DAYS};
