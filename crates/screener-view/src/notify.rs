//! Ephemeral user notifications.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// How long a notification stays up before it dismisses itself, in milliseconds.
pub const AUTO_HIDE_MS: i64 = 3000;

/// Notification severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Operation succeeded.
    Success,
    /// Informational notice.
    Info,
    /// Request refused before it was sent.
    Warning,
    /// Operation failed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A short-lived message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// When the notification was raised.
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    /// Raises a notification now.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self::at(severity, message, Utc::now())
    }

    /// Raises a notification at a given instant.
    #[must_use]
    pub fn at(severity: Severity, message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self {
            severity,
            message: message.into(),
            raised_at,
        }
    }

    /// Returns true once [`AUTO_HIDE_MS`] have elapsed since it was raised.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.raised_at) >= TimeDelta::milliseconds(AUTO_HIDE_MS)
    }

    /// `Failed to load fields from API`.
    #[must_use]
    pub fn fields_failed() -> Self {
        Self::new(Severity::Error, "Failed to load fields from API")
    }

    /// `Please add at least one filter`.
    #[must_use]
    pub fn no_filters() -> Self {
        Self::new(Severity::Warning, "Please add at least one filter")
    }

    /// `No results found for your query`.
    #[must_use]
    pub fn no_results() -> Self {
        Self::new(Severity::Info, "No results found for your query")
    }

    /// `Found {count} results`.
    #[must_use]
    pub fn found(count: usize) -> Self {
        Self::new(Severity::Success, format!("Found {count} results"))
    }

    /// `Query failed: {reason}`.
    #[must_use]
    pub fn query_failed(reason: &str) -> Self {
        Self::new(Severity::Error, format!("Query failed: {reason}"))
    }

    /// `Invalid row data`.
    #[must_use]
    pub fn invalid_row() -> Self {
        Self::new(Severity::Error, "Invalid row data")
    }

    /// `Failed to load company details`.
    #[must_use]
    pub fn company_failed() -> Self {
        Self::new(Severity::Error, "Failed to load company details")
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_hide() {
        let raised = Utc::now();
        let n = Notification::at(Severity::Info, "hello", raised);
        assert!(!n.is_expired(raised));
        assert!(!n.is_expired(raised + TimeDelta::milliseconds(2999)));
        assert!(n.is_expired(raised + TimeDelta::seconds(3)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(Notification::found(2).message, "Found 2 results");
        assert_eq!(Notification::found(2).severity, Severity::Success);
        assert_eq!(Notification::no_filters().severity, Severity::Warning);
        assert_eq!(
            Notification::query_failed("Unknown error").to_string(),
            "[error] Query failed: Unknown error"
        );
    }
}
