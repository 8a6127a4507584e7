//! User-visible acknowledgment seam.
//!
//! Every successful login/register/logout produces a transient
//! acknowledgment and every failure a blocking alert. Those are
//! presentation concerns, so the manager talks to this trait instead of
//! any concrete toast/alert widget.

/// Sink for user-visible session notifications.
pub trait Notifier: Send + Sync {
    /// Transient acknowledgment of a successful action.
    fn acknowledge(&self, message: &str);

    /// Blocking alert for a failed action.
    fn alert(&self, message: &str);
}

/// Notifier that drops everything. Useful in tests and headless contexts.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn acknowledge(&self, _message: &str) {}
    fn alert(&self, _message: &str) {}
}

/// Notifier that routes messages into the log stream.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn acknowledge(&self, message: &str) {
        tracing::info!(notice = %message, "session notice");
    }

    fn alert(&self, message: &str) {
        tracing::error!(alert = %message, "session alert");
    }
}
