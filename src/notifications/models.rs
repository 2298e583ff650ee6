//! Notification payloads and sinks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Screen a notification opens when clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub screen: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub action: NotificationAction,
    pub created_at: DateTime<Utc>,
}

/// Receiver of notifications produced by a sweep
pub trait NotificationSink {
    /// Returns false when the notification was not accepted
    fn add_notification(&mut self, notification: Notification) -> bool;
}

/// Sink that keeps notifications in memory, skipping repeated ids
#[derive(Debug, Default)]
pub struct MemorySink {
    pub notifications: Vec<Notification>,
}

impl NotificationSink for MemorySink {
    fn add_notification(&mut self, notification: Notification) -> bool {
        if self.notifications.iter().any(|n| n.id == notification.id) {
            return false;
        }
        self.notifications.push(notification);
        true
    }
}
