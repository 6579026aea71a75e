//! Duration resolution: computing a subscription's end date.
//!
//! Pure function of its inputs. The start date is caller-supplied and may
//! be future-dated for scheduled subscriptions; nothing here reads the
//! clock.

use chrono::{Days, Months, NaiveDate};

use crate::catalog::DurationPolicy;
use crate::error::{CoreError, Result};

/// Computes the end date for a subscription starting on `start_date` under
/// the given duration policy.
///
/// Credit-based policies have no calendar expiry and yield `None`.
/// Calendar policies advance the start date by the configured number of
/// units. Month and year advancement lands on the same day-of-month where
/// it exists and clamps to the last valid day of the target month
/// otherwise, so Jan 31 plus one month is the last day of February.
///
/// A zero `value` is a product configuration error and is rejected by
/// product validation before a policy reaches this resolver.
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] if the calendar arithmetic
/// overflows the supported date range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gym_admin_core::catalog::{DurationPolicy, DurationUnit};
/// use gym_admin_core::subscription::duration::resolve_end_date;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// let policy = DurationPolicy::Calendar { unit: DurationUnit::Months, value: 1 };
///
/// let end = resolve_end_date(start, &policy).unwrap();
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29)); // leap year
/// ```
pub fn resolve_end_date(
    start_date: NaiveDate,
    policy: &DurationPolicy,
) -> Result<Option<NaiveDate>> {
    use crate::catalog::DurationUnit::{Days as D, Months as M, Weeks as W, Years as Y};

    let end = match *policy {
        DurationPolicy::Credits { .. } => return Ok(None),
        DurationPolicy::Calendar { unit: D, value } => {
            start_date.checked_add_days(Days::new(u64::from(value)))
        }
        DurationPolicy::Calendar { unit: W, value } => {
            start_date.checked_add_days(Days::new(u64::from(value) * 7))
        }
        DurationPolicy::Calendar { unit: M, value } => {
            start_date.checked_add_months(Months::new(value))
        }
        DurationPolicy::Calendar { unit: Y, value } => value
            .checked_mul(12)
            .and_then(|months| start_date.checked_add_months(Months::new(months))),
    };

    end.map(Some).ok_or_else(|| {
        CoreError::Configuration(format!(
            "duration policy {} overflows the calendar from {start_date}",
            policy.display_label()
        ))
    })
}
