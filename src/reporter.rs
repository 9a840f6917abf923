use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, warn};

use crate::api::ApiError;

/// The one generic message shown to the user when a request fails.
pub const ALERT_TEXT: &str =
    "Something went wrong. Please check your internet connection or try again later.";

/// Funnel for request failures. Every failure is logged in full; at most one
/// user-facing alert is handed out per process lifetime, tracked by an
/// explicit latch.
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    alerted: Arc<AtomicBool>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the failure and claim the alert if nobody has yet. Returns the
    /// alert text exactly once per process.
    pub fn report(&self, context: &'static str, err: &ApiError) -> Option<&'static str> {
        error!(context, error = %err, "request failed");
        if self.alerted.swap(true, Ordering::Relaxed) {
            None
        } else {
            Some(ALERT_TEXT)
        }
    }

    /// Offline gates are warnings, not failures: they repeat every time and
    /// leave the alert latch alone.
    pub fn warn_offline(&self, action: &'static str) {
        warn!(action, "offline, request not attempted");
    }

    pub fn has_alerted(&self) -> bool {
        self.alerted.load(Ordering::Relaxed)
    }

    /// Unlatch. Nothing calls this during a session; the alert stays
    /// once-per-run.
    pub fn reset(&self) {
        self.alerted.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_err() -> ApiError {
        ApiError::Transport {
            method: "GET",
            url: "http://localhost/todos".to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn first_failure_gets_the_alert_later_ones_do_not() {
        let reporter = ErrorReporter::new();
        assert_eq!(reporter.report("load", &transport_err()), Some(ALERT_TEXT));
        assert_eq!(reporter.report("load", &transport_err()), None);
        assert_eq!(reporter.report("delete", &transport_err()), None);
        assert!(reporter.has_alerted());
    }

    #[test]
    fn clones_share_the_latch() {
        let reporter = ErrorReporter::new();
        let clone = reporter.clone();
        assert!(clone.report("create", &transport_err()).is_some());
        assert!(reporter.report("create", &transport_err()).is_none());
    }

    #[test]
    fn offline_warnings_do_not_consume_the_latch() {
        let reporter = ErrorReporter::new();
        reporter.warn_offline("toggle");
        reporter.warn_offline("delete");
        assert!(!reporter.has_alerted());
        assert!(reporter.report("toggle", &transport_err()).is_some());
    }

    #[test]
    fn reset_unlatches() {
        let reporter = ErrorReporter::new();
        assert!(reporter.report("load", &transport_err()).is_some());
        reporter.reset();
        assert!(reporter.report("load", &transport_err()).is_some());
    }
}
