//! Expiration classifier.
//!
//! Statuses are computed from whole calendar days between a reference day
//! (normally today) and the expiration date.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Freshness of a lot relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpirationStatus {
    /// More than two days left
    Ok,
    /// One or two days left
    ExpiringSoon,
    /// Expires on the reference day
    DueToday,
    /// Already past its date
    Expired,
}

impl ExpirationStatus {
    /// Short label for display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::DueToday => "Use today",
            Self::ExpiringSoon => "Expiring soon",
            Self::Ok => "OK",
        }
    }
}

/// Days forecasting treats as "expiring" relative to tomorrow
pub const FORECAST_EXPIRING_DAYS: i64 = 2;

/// Today's date in local time.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The day after `today`.
#[must_use]
pub fn tomorrow_of(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// Whole days from `reference` until `expiration_date` (negative when past).
#[must_use]
pub fn days_until(expiration_date: NaiveDate, reference: NaiveDate) -> i64 {
    (expiration_date - reference).num_days()
}

/// Classifies `expiration_date` relative to `reference`.
#[must_use]
pub fn expiration_status(expiration_date: NaiveDate, reference: NaiveDate) -> ExpirationStatus {
    match days_until(expiration_date, reference) {
        d if d < 0 => ExpirationStatus::Expired,
        0 => ExpirationStatus::DueToday,
        1..=2 => ExpirationStatus::ExpiringSoon,
        _ => ExpirationStatus::Ok,
    }
}

/// Past its date relative to `today`.
#[must_use]
pub fn is_expired(expiration_date: NaiveDate, today: NaiveDate) -> bool {
    expiration_status(expiration_date, today) == ExpirationStatus::Expired
}

/// Due today or already expired; such lots will not survive until tomorrow.
#[must_use]
pub fn is_due_today_or_expired(expiration_date: NaiveDate, today: NaiveDate) -> bool {
    matches!(
        expiration_status(expiration_date, today),
        ExpirationStatus::Expired | ExpirationStatus::DueToday
    )
}

/// Forecast sense of "expiring": at most two days left counting from tomorrow.
#[must_use]
pub fn is_expiring_for_tomorrow(expiration_date: NaiveDate, today: NaiveDate) -> bool {
    days_until(expiration_date, tomorrow_of(today)) <= FORECAST_EXPIRING_DAYS
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expiration_status_buckets() {
        let today = day(2025, 3, 10);
        assert_eq!(expiration_status(day(2025, 3, 9), today), ExpirationStatus::Expired);
        assert_eq!(expiration_status(day(2024, 12, 1), today), ExpirationStatus::Expired);
        assert_eq!(expiration_status(today, today), ExpirationStatus::DueToday);
        assert_eq!(
            expiration_status(day(2025, 3, 11), today),
            ExpirationStatus::ExpiringSoon
        );
        assert_eq!(
            expiration_status(day(2025, 3, 12), today),
            ExpirationStatus::ExpiringSoon
        );
        assert_eq!(expiration_status(day(2025, 3, 13), today), ExpirationStatus::Ok);
    }

    #[test]
    fn test_exclusion_filters() {
        let today = day(2025, 3, 10);
        assert!(is_expired(day(2025, 3, 9), today));
        assert!(!is_expired(today, today));
        assert!(is_due_today_or_expired(today, today));
        assert!(is_due_today_or_expired(day(2025, 3, 1), today));
        assert!(!is_due_today_or_expired(day(2025, 3, 11), today));
    }

    #[test]
    fn test_forecast_expiring_counts_from_tomorrow() {
        let today = day(2025, 3, 10);
        // Tomorrow is the 11th; the 13th is two days out
        assert!(is_expiring_for_tomorrow(day(2025, 3, 13), today));
        assert!(!is_expiring_for_tomorrow(day(2025, 3, 14), today));
        assert!(is_expiring_for_tomorrow(day(2025, 3, 5), today));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ExpirationStatus::DueToday.label(), "Use today");
        assert_eq!(ExpirationStatus::Ok.label(), "OK");
    }
}
