//! Contracts for the remote services the controllers talk to, and the
//! notification channel they report through.

use crate::ConfigRecord;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub trait ProcessSettingsService {
    /// Full list of configuration records, in no particular order.
    fn fetch_config_records(&mut self) -> anyhow::Result<Vec<ConfigRecord>>;

    /// Batch upsert by record identifier.
    fn persist_config_records(&mut self, records: &[ConfigRecord]) -> anyhow::Result<()>;
}

pub trait ProcessVariablesService {
    fn fetch_process_variables(&mut self) -> anyhow::Result<VariableValues>;

    fn fetch_label_overrides(&mut self) -> anyhow::Result<LabelOverrides>;

    /// Persist both variables and return what the backend now holds.
    fn persist_process_variables(&mut self, values: &VariableValues)
    -> anyhow::Result<VariableValues>;
}

/// Process-control variables as exchanged with the backend.
/// `timestamp` is RFC 3339 when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableValues {
    #[serde(default)]
    pub flag: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Optional display-label overrides; missing keys keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// Fire-and-forget sink for user-visible notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);

    fn info(&mut self, title: &str, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notification::new(title, message, Severity::Info));
    }

    fn success(&mut self, title: &str, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notification::new(title, message, Severity::Success));
    }

    fn error(&mut self, title: &str, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notification::new(title, message, Severity::Error));
    }
}

/// Keeps the most recent notifications in memory, oldest first.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> &VecDeque<Notification> {
        &self.entries
    }

    pub fn last(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.message
            ),
            _ => tracing::debug!(
                title = %notification.title,
                "{}",
                notification.message
            ),
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(notification);
    }
}
