//! Toast-style notifications.
//!
//! At most one notification of a given severity is visible at a time:
//! showing a new one replaces any older notification of the same
//! severity. Entries expire after a per-severity duration and are
//! purged lazily.

use std::time::{Duration, Instant};

use crate::api::ApiError;

/// Notification severity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
    Danger,
    Logout,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Danger => "danger",
            Severity::Logout => "logout",
        }
    }

    /// How long a notification of this severity stays up by default.
    /// Errors linger longer so they are not missed.
    fn default_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success => Some(Duration::from_secs(4)),
            Severity::Error => Some(Duration::from_secs(6)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Info => Some(Duration::from_secs(5)),
            Severity::Danger => Some(Duration::from_secs(6)),
            Severity::Logout => Some(Duration::from_secs(4)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
    duration: Option<Duration>,
}

impl Notification {
    fn is_expired_at(&self, now: Instant) -> bool {
        match self.duration {
            Some(d) => now.duration_since(self.shown_at) > d,
            // No duration = sticky until replaced or dismissed
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification with the severity's default duration.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_for(message, severity, severity.default_duration());
    }

    /// Show a notification with an explicit duration (`None` = sticky).
    pub fn show_for(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
    ) {
        // One instance of a given class at a time
        self.items.retain(|n| n.severity != severity);
        self.items.push(Notification {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
            duration,
        });
    }

    /// Drop notifications past their duration.
    pub fn purge_expired(&mut self) {
        self.purge_expired_at(Instant::now());
    }

    fn purge_expired_at(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired_at(now));
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Human-readable text for an API failure, keyed by its coarse
/// signature, with a generic fallback.
pub fn error_message(err: &ApiError) -> String {
    match err {
        ApiError::Timeout | ApiError::Network(_) => {
            "Could not reach the server. Check your connection.".to_string()
        }
        ApiError::Unauthorized => "Please sign in again.".to_string(),
        ApiError::Forbidden(_) => "You do not have access to this data.".to_string(),
        ApiError::NotFound(_) => "The requested data was not found.".to_string(),
        ApiError::ServerError(_) => {
            "The server ran into a problem. Try again later.".to_string()
        }
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn same_severity_notifications_replace_each_other() {
        let mut center = NotificationCenter::new();
        center.show("first", Severity::Error);
        center.show("second", Severity::Error);
        center.show("saved", Severity::Success);

        assert_eq!(center.items().len(), 2);
        let error = center
            .items()
            .iter()
            .find(|n| n.severity == Severity::Error)
            .unwrap();
        assert_eq!(error.message, "second");
    }

    #[test]
    fn different_severities_coexist() {
        let mut center = NotificationCenter::new();
        center.show("a", Severity::Info);
        center.show("b", Severity::Warning);
        center.show("c", Severity::Logout);
        assert_eq!(center.items().len(), 3);
    }

    #[test]
    fn expired_notifications_are_purged() {
        let mut center = NotificationCenter::new();
        center.show_for("short", Severity::Info, Some(Duration::from_secs(1)));
        center.show_for("sticky", Severity::Warning, None);

        let later = Instant::now() + Duration::from_secs(2);
        center.purge_expired_at(later);

        assert_eq!(center.items().len(), 1);
        assert_eq!(center.items()[0].message, "sticky");
    }

    #[test]
    fn dismiss_all_clears_everything() {
        let mut center = NotificationCenter::new();
        center.show("a", Severity::Info);
        center.show_for("b", Severity::Warning, None);
        center.dismiss_all();
        assert!(center.is_empty());
    }

    #[test]
    fn error_messages_map_coarse_signatures() {
        assert!(error_message(&ApiError::Timeout).contains("connection"));
        assert!(error_message(&ApiError::Unauthorized).contains("sign in"));
        assert!(error_message(&ApiError::Forbidden(String::new())).contains("access"));
        assert!(error_message(&ApiError::NotFound(String::new())).contains("not found"));
        assert!(
            error_message(&ApiError::from_status(StatusCode::BAD_GATEWAY, "")).contains("server")
        );
        // Unrecognized errors fall back to the generic message
        assert!(error_message(&ApiError::InvalidResponse(String::new()))
            .contains("Something went wrong"));
    }
}
