//! Notification sink used to surface operation outcomes to the user.

use crate::error::DashboardError;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Returns an emoji representation of the kind.
    pub fn emoji(&self) -> &'static str {
        match self {
            NotificationKind::Success => "✅",
            NotificationKind::Warning => "⚠️",
            NotificationKind::Error => "❌",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Anything able to present notifications to the user.
pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Route an error to the sink. Silent skips are dropped here.
pub fn report(sink: &dyn NotificationSink, err: &DashboardError) {
    if let Some(notification) = err.to_notification() {
        sink.show(notification);
    }
}

/// Prints notifications to the terminal. The log only gets a debug-level
/// copy, so each notification shows once at the default level.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn prints(&self, kind: NotificationKind) -> bool {
        !(self.quiet && kind == NotificationKind::Success)
    }
}

impl Notification {
    /// One-line terminal form: emoji, title, message.
    pub fn console_line(&self) -> String {
        format!("{} {}: {}", self.kind.emoji(), self.title, self.message)
    }
}

impl NotificationSink for ConsoleSink {
    fn show(&self, notification: Notification) {
        debug!(kind = %notification.kind, title = %notification.title, "{}", notification.message);

        if !self.prints(notification.kind) {
            return;
        }
        match notification.kind {
            NotificationKind::Success => println!("{}", notification.console_line()),
            _ => eprintln!("{}", notification.console_line()),
        }
    }
}
