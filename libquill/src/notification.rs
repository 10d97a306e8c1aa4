//! Transient user-facing status messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
            NotificationKind::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub content: String,
}

impl Notification {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            content: content.into(),
        }
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            content: content.into(),
        }
    }

    /// Start showing this notification at `now` for `duration`
    pub fn shown_at(self, now: DateTime<Utc>, duration: Duration) -> ActiveNotification {
        let duration = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);
        ActiveNotification {
            notification: self,
            expires_at: now.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// A notification currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub notification: Notification,
    pub expires_at: DateTime<Utc>,
}

impl ActiveNotification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Display durations per notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationDurations {
    pub success: Duration,
    pub error: Duration,
}

impl NotificationDurations {
    pub fn for_kind(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::Success | NotificationKind::Info => self.success,
            NotificationKind::Error => self.error,
        }
    }
}

impl Default for NotificationDurations {
    fn default() -> Self {
        Self {
            success: Duration::from_secs(3),
            error: Duration::from_secs(5),
        }
    }
}

impl From<&crate::config::NotificationConfig> for NotificationDurations {
    fn from(config: &crate::config::NotificationConfig) -> Self {
        Self {
            success: Duration::from_secs(config.success_secs),
            error: Duration::from_secs(config.error_secs),
        }
    }
}
