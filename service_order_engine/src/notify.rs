//! User-facing notifications.
//!
//! Validation failures and accepted orders are reported to the person
//! filling in the order through a [`Notifier`].  The notifier is passed
//! to the [`crate::order::OrderDesk`] explicitly, so each embedding
//! decides where notifications end up.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A single message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Delivers notifications to the user.
///
/// Notifiers must be thread-safe (`Send + Sync`) because the HTTP
/// server shares one across request handlers.
pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
pub struct TracingNotifier;

impl TracingNotifier {
    /// Log level for a notification.  Error notifications describe invalid
    /// user input and are logged at WARN.
    pub fn level(severity: Severity) -> Level {
        match severity {
            Severity::Info | Severity::Success => Level::INFO,
            Severity::Warning | Severity::Error => Level::WARN,
        }
    }
}

impl Notifier for TracingNotifier {
    fn show(&self, notification: Notification) {
        let Notification { severity, title, message } = notification;
        if Self::level(severity) == Level::WARN {
            tracing::warn!(?severity, %title, %message, "notification");
        } else {
            tracing::info!(?severity, %title, %message, "notification");
        }
    }
}

/// Keeps every notification in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notifications shown so far, oldest first.
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: Notification) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
