//! Calendar-date normalization helpers.
//!
//! Due dates arrive in mixed shapes: date-only strings (`2024-08-15`),
//! ISO timestamps (`2024-08-15T10:00:00Z`), and chrono values. Everything
//! funnels through one canonical `YYYY-MM-DD` local-calendar form so that
//! same-day and overdue checks never depend on time-of-day or offset
//! arithmetic.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Types that reduce to a local calendar date.
///
/// String inputs keep the calendar date as written; running them through
/// a timezone conversion would shift dates near midnight. Typed datetime
/// values convert through the local zone.
pub trait LocalDate {
    fn local_date(&self) -> Option<NaiveDate>;
}

impl LocalDate for NaiveDate {
    fn local_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl LocalDate for DateTime<Utc> {
    fn local_date(&self) -> Option<NaiveDate> {
        Some(self.with_timezone(&Local).date_naive())
    }
}

impl LocalDate for DateTime<Local> {
    fn local_date(&self) -> Option<NaiveDate> {
        Some(self.date_naive())
    }
}

impl LocalDate for str {
    fn local_date(&self) -> Option<NaiveDate> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        // Take the date portion of an ISO timestamp as written
        let date_part = trimmed.split('T').next().unwrap_or(trimmed);
        let date_part = date_part.trim_end_matches('Z');
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

impl LocalDate for String {
    fn local_date(&self) -> Option<NaiveDate> {
        self.as_str().local_date()
    }
}

impl<T: LocalDate> LocalDate for Option<T> {
    fn local_date(&self) -> Option<NaiveDate> {
        self.as_ref().and_then(|v| v.local_date())
    }
}

impl<T: LocalDate + ?Sized> LocalDate for &T {
    fn local_date(&self) -> Option<NaiveDate> {
        (**self).local_date()
    }
}

/// Normalize any supported date shape to a `YYYY-MM-DD` string.
/// Invalid input yields `None` rather than an error.
pub fn to_local_date_string<T: LocalDate + ?Sized>(value: &T) -> Option<String> {
    value.local_date().map(|d| d.format("%Y-%m-%d").to_string())
}

/// Today's date in the local timezone as `YYYY-MM-DD`.
pub fn today_string() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Whether two values fall on the same calendar date.
/// False if either side fails to normalize.
pub fn is_same_date<A, B>(a: &A, b: &B) -> bool
where
    A: LocalDate + ?Sized,
    B: LocalDate + ?Sized,
{
    match (a.local_date(), b.local_date()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Whether the value falls on today's local calendar date.
pub fn is_today<T: LocalDate + ?Sized>(value: &T) -> bool {
    is_same_date(value, &Local::now().date_naive())
}

/// Whether the value is strictly before today. Missing or invalid
/// dates are not overdue.
pub fn is_overdue<T: LocalDate + ?Sized>(value: &T) -> bool {
    match value.local_date() {
        Some(d) => d < Local::now().date_naive(),
        None => false,
    }
}
