//! Product catalog: reusable subscription offerings.
//!
//! A [`Product`] defines what a gym sells: a price, a duration policy
//! (calendar-based or credit-based) and an active flag. Products are leaf
//! reference data; subscriptions reference them by id.

pub mod product;

pub use product::{DurationPolicy, DurationUnit, Product, ProductId};
